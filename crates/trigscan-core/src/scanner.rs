//! Scan driver: sweeps the stream, votes, prunes, and attaches payloads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::collector::{collect_window, Probe};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::fingerprint::Fingerprinter;
use crate::payload::attach_payload;
use crate::pruner::prune_tags;
use crate::stream::{muldiv, ScanRequest};
use crate::tag::{ScanResponse, TriggerTag};
use crate::voter::vote;


/// Cooperative cancellation flag checked between scan offsets.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives a full trigger-sound scan over one audio stream.
pub struct TriggerScanner<F> {
    config: ScanConfig,
    tool: F,
}

impl<F: Fingerprinter> TriggerScanner<F> {
    pub fn new(config: ScanConfig, tool: F) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tool })
    }

    /// Run a scan to completion.
    pub fn scan(&self, request: &ScanRequest) -> Result<ScanResponse> {
        self.scan_with_cancel(request, &CancelToken::new())
    }

    /// Run a scan, checking `cancel` between offsets. A cancelled scan
    /// returns no partial result.
    pub fn scan_with_cancel(
        &self,
        request: &ScanRequest,
        cancel: &CancelToken,
    ) -> Result<ScanResponse> {
        request.validate()?;
        let duration = request.stream.duration as i64;
        let data_offset = request.data_offset;
        let rate = request.stream.fingerprint_rate as i64;
        let max_duration = muldiv(1000, duration, 1);
        let counts = muldiv(1000, duration, self.config.stride_ms);
        let duration_limit = data_offset + muldiv(1000, duration - 5, 1);

        let mut candidates = if self.config.workers > 1 {
            self.sweep_parallel(request, cancel, counts, max_duration, duration_limit)?
        } else {
            self.sweep_sequential(request, cancel, counts, max_duration, duration_limit)?
        };
        // Voting groups overlap, so emission order is not position order.
        candidates.sort_by_key(|tag| tag.data_position);

        let mut live_tags = Vec::new();
        if !candidates.is_empty() {
            let pruned = prune_tags(&candidates, self.config.prune_radius_ms);
            if self.config.debug {
                log::debug!(
                    "pruning kept {} of {} candidate tags",
                    pruned.len(),
                    candidates.len()
                );
            }
            for tag in pruned {
                if self.config.debug {
                    log::debug!(
                        "tag at {}ms (limit {}ms, stream ends {}ms, frame {})",
                        tag.data_position,
                        duration_limit,
                        data_offset + max_duration,
                        tag.most_similar_frame_position
                    );
                }
                let attached = attach_payload(
                    &self.tool,
                    &request.stream.data,
                    rate,
                    data_offset,
                    max_duration,
                    tag,
                )?;
                if let Some(tagged) = attached {
                    live_tags.push(tagged);
                }
            }
        }
        Ok(ScanResponse::from_tags(live_tags))
    }

    fn sweep_sequential(
        &self,
        request: &ScanRequest,
        cancel: &CancelToken,
        counts: i64,
        max_duration: i64,
        duration_limit: i64,
    ) -> Result<Vec<TriggerTag>> {
        let mut candidates = Vec::new();
        let mut count = 0;
        let mut elapse = 0;
        while count < counts && elapse < max_duration {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            let group = self.collect_at(request, elapse)?;
            if self.accept(&group, request.data_offset, duration_limit, &mut candidates) {
                break;
            }
            count += 1;
            elapse += self.config.stride_ms;
        }
        Ok(candidates)
    }

    /// Collect window groups across offsets on a bounded worker pool, then
    /// vote over them in ascending offset order. Output matches the
    /// sequential sweep.
    fn sweep_parallel(
        &self,
        request: &ScanRequest,
        cancel: &CancelToken,
        counts: i64,
        max_duration: i64,
        duration_limit: i64,
    ) -> Result<Vec<TriggerTag>> {
        let offsets: Vec<i64> = (0..counts)
            .map(|count| count * self.config.stride_ms)
            .filter(|&elapse| elapse < max_duration)
            .collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|err| ScanError::Other(anyhow::anyhow!("worker pool: {}", err)))?;
        let groups: Vec<Result<Vec<Probe>>> = pool.install(|| {
            offsets
                .par_iter()
                .map(|&elapse| {
                    if cancel.is_cancelled() {
                        return Ok(Vec::new());
                    }
                    self.collect_at(request, elapse)
                })
                .collect()
        });
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        let mut candidates = Vec::new();
        for group in groups {
            let group = group?;
            if self.accept(&group, request.data_offset, duration_limit, &mut candidates) {
                break;
            }
        }
        Ok(candidates)
    }

    fn collect_at(&self, request: &ScanRequest, elapse: i64) -> Result<Vec<Probe>> {
        collect_window(
            &self.tool,
            &request.stream.data,
            elapse,
            request.stream.fingerprint_rate as i64,
            &request.reference.data,
            self.config.probe_delta_ms,
            self.config.window_ms,
        )
    }

    /// Vote over one group and stash the resulting candidate. Returns true
    /// when the sweep must stop: a candidate past the duration limit ends
    /// the scan without being kept, so the payload region of every kept tag
    /// stays inside the buffer.
    fn accept(
        &self,
        group: &[Probe],
        data_offset: i64,
        duration_limit: i64,
        candidates: &mut Vec<TriggerTag>,
    ) -> bool {
        let Some(hit) = vote(group) else {
            return false;
        };
        let probe = &group[hit.index];
        let tag = TriggerTag::from_hit(data_offset, probe.offset_ms, &probe.comparison);
        if self.config.debug {
            log::debug!(
                "candidate tag at {}ms ({:?}, frame {}, score {:.3}, similarity {:.3})",
                tag.data_position,
                hit.shape,
                tag.most_similar_frame_position,
                tag.score,
                tag.similarity
            );
        }
        if tag.data_position > duration_limit {
            return true;
        }
        candidates.push(tag);
        false
    }
}
