//! Stream selection rules.

use std::sync::Arc;

use super::config::QualityConfig;
use super::error::QualityError;
use super::traits::CodecChooser;
use crate::media::{AudioQuality, MediaItem, StreamDescriptor};

/// The selected stream and any downgrade that happened on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatedStream {
    pub descriptor: StreamDescriptor,
    pub downgrades: Vec<String>,
}

/// Chooses one stream per item.
pub struct QualityNegotiator {
    config: QualityConfig,
    chooser: Option<Arc<dyn CodecChooser>>,
    prefer_drm_free: bool,
}

impl QualityNegotiator {
    pub fn new(config: QualityConfig) -> Self {
        Self {
            config,
            chooser: None,
            prefer_drm_free: false,
        }
    }

    /// Sets the chooser consulted in ask mode.
    pub fn with_chooser(mut self, chooser: Arc<dyn CodecChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Prefers DRM-free candidates when any exist, used when licensing is off.
    pub fn with_prefer_drm_free(mut self, prefer: bool) -> Self {
        self.prefer_drm_free = prefer;
        self
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Picks exactly one stream for `item` out of `candidates`.
    pub async fn negotiate(
        &self,
        item: &MediaItem,
        candidates: Vec<StreamDescriptor>,
    ) -> Result<NegotiatedStream, QualityError> {
        let wants_video = item.kind.is_video();
        let mut pool: Vec<StreamDescriptor> = candidates
            .into_iter()
            .filter(|c| c.is_video() == wants_video)
            .collect();

        if pool.is_empty() {
            let reason = if wants_video {
                "no video streams offered"
            } else {
                "no audio streams offered"
            };
            return Err(QualityError::no_eligible(&item.id, reason));
        }

        if !self.config.allow_drm {
            pool.retain(|c| !c.is_drm());
            if pool.is_empty() {
                return Err(QualityError::no_eligible(
                    &item.id,
                    "every candidate requires DRM and DRM streams are not allowed",
                ));
            }
        }

        if self.prefer_drm_free && pool.iter().any(|c| !c.is_drm()) {
            pool.retain(|c| !c.is_drm());
        }

        let mut downgrades = Vec::new();
        let eligible = if wants_video {
            self.eligible_video(item, pool)?
        } else {
            self.eligible_audio(item, pool, &mut downgrades)?
        };

        let asks = if wants_video {
            self.config.asks_for_video()
        } else {
            self.config.asks_for_audio()
        };

        let descriptor = match (&self.chooser, asks && eligible.len() > 1) {
            (Some(chooser), true) => {
                tracing::info!(item_id = %item.id, candidates = eligible.len(), "Waiting for stream selection");
                let index = chooser.choose(item, &eligible).await?;
                let count = eligible.len();
                eligible
                    .into_iter()
                    .nth(index)
                    .ok_or(QualityError::InvalidChoice { index, count })?
            }
            (None, true) => {
                tracing::warn!(item_id = %item.id, "Ask mode without a chooser, selecting automatically");
                self.pick(eligible, wants_video)
                    .ok_or_else(|| QualityError::no_eligible(&item.id, "no candidates left"))?
            }
            (_, false) => self
                .pick(eligible, wants_video)
                .ok_or_else(|| QualityError::no_eligible(&item.id, "no candidates left"))?,
        };

        for note in &downgrades {
            tracing::warn!(item_id = %item.id, "{}", note);
        }
        tracing::debug!(item_id = %item.id, stream = %descriptor.summary(), "Stream selected");

        Ok(NegotiatedStream {
            descriptor,
            downgrades,
        })
    }

    /// Entitled tier to start from, recording a note when it differs from the request.
    fn entitled_tier(&self, downgrades: &mut Vec<String>) -> Option<AudioQuality> {
        let requested = self.config.audio_quality;
        let mut tier = Some(requested);
        while let Some(t) = tier {
            if !t.requires_premium() || self.config.premium {
                break;
            }
            tier = t.previous();
        }
        if let Some(t) = tier {
            if t != requested {
                downgrades.push(format!(
                    "{} requires premium, downgraded to {}",
                    requested, t
                ));
            }
        }
        tier
    }

    fn eligible_audio(
        &self,
        item: &MediaItem,
        pool: Vec<StreamDescriptor>,
        downgrades: &mut Vec<String>,
    ) -> Result<Vec<StreamDescriptor>, QualityError> {
        // Untiered audio (podcasts) is not subject to tier rules.
        if pool.iter().all(|c| c.audio_quality.is_none()) {
            return Ok(pool);
        }

        let entitled: Vec<StreamDescriptor> = pool
            .into_iter()
            .filter(|c| {
                c.audio_quality
                    .map(|q| self.config.premium || !q.requires_premium())
                    .unwrap_or(false)
            })
            .collect();

        let start = self.entitled_tier(downgrades).ok_or_else(|| {
            QualityError::no_eligible(
                &item.id,
                format!("{} is not available without premium", self.config.audio_quality),
            )
        })?;

        if self.config.selection == super::SelectionMode::Ask {
            if entitled.is_empty() {
                return Err(QualityError::no_eligible(&item.id, "no entitled audio tier offered"));
            }
            return Ok(entitled);
        }

        let mut tier = Some(start);
        while let Some(t) = tier {
            let matching: Vec<StreamDescriptor> = entitled
                .iter()
                .filter(|c| c.audio_quality == Some(t))
                .cloned()
                .collect();
            if !matching.is_empty() {
                if t != start {
                    downgrades.push(format!("{} not offered, downgraded to {}", start, t));
                }
                return Ok(matching);
            }
            tier = t.previous();
        }

        Err(QualityError::no_eligible(
            &item.id,
            format!("{} or a lower tier of the same codec is not offered", start),
        ))
    }

    fn eligible_video(
        &self,
        item: &MediaItem,
        mut pool: Vec<StreamDescriptor>,
    ) -> Result<Vec<StreamDescriptor>, QualityError> {
        if let Some(container) = self.config.video_format.container() {
            pool.retain(|c| c.container == container);
            if pool.is_empty() {
                return Err(QualityError::no_eligible(
                    &item.id,
                    format!("no {} video streams offered", container),
                ));
            }
        }
        Ok(pool)
    }

    /// Applies the automatic rule to an eligible set.
    fn pick(&self, eligible: Vec<StreamDescriptor>, video: bool) -> Option<StreamDescriptor> {
        if !video {
            return eligible.into_iter().max_by_key(|c| c.bitrate_kbps);
        }

        let requested = self.config.video_resolution.height();
        let height = |c: &StreamDescriptor| c.resolution.map(|r| r.height()).unwrap_or(0);

        let best_below = eligible
            .iter()
            .filter(|c| height(*c) <= requested)
            .max_by_key(|c| (height(*c), c.bitrate_kbps))
            .cloned();

        best_below.or_else(|| {
            let lowest = eligible.iter().map(height).min()?;
            eligible
                .into_iter()
                .filter(|c| height(c) == lowest)
                .max_by_key(|c| c.bitrate_kbps)
        })
    }
}
