/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and pipeline statistics to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second) and frame time
 * - Physics steps run per rendered frame
 * - The last frame report (agents, cells, skipped agents)
 * - How many frames were skipped and why
 */

use std::time::Duration;

use crate::driver::{FrameOutcome, FrameReport, SkipReason};

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_updates_per_frame: usize,
    pub last_report: Option<FrameReport>,
    pub empty_frames: u64,
    pub disabled_frames: u64,
    pub total_skipped_agents: u64,
}

impl DebugInfo {
    pub fn record(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Completed(report) => {
                self.total_skipped_agents += report.skipped_agents as u64;
                self.last_report = Some(*report);
            }
            FrameOutcome::Skipped(SkipReason::EmptyPopulation) => self.empty_frames += 1,
            FrameOutcome::Skipped(SkipReason::Disabled) => self.disabled_frames += 1,
        }
    }

    // Average agents per occupied cell in the last frame
    pub fn mean_cell_occupancy(&self) -> Option<f32> {
        let report = self.last_report?;
        if report.cell_count == 0 {
            return None;
        }
        Some(report.agent_count as f32 / report.cell_count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_reports_and_skips() {
        let mut info = DebugInfo::default();
        info.record(&FrameOutcome::Skipped(SkipReason::EmptyPopulation));
        info.record(&FrameOutcome::Completed(FrameReport {
            frame: 3,
            agent_count: 40,
            cell_count: 8,
            skipped_agents: 2,
        }));

        assert_eq!(info.empty_frames, 1);
        assert_eq!(info.total_skipped_agents, 2);
        assert_eq!(info.last_report.map(|r| r.frame), Some(3));
        assert_eq!(info.mean_cell_occupancy(), Some(5.0));
    }
}
