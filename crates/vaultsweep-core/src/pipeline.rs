use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dedup::{DuplicateFinder, PairOrder};
use crate::filters::{self, Removal};
use crate::merge::{MergeOutcome, MergeRecord, MergeResolver};
use crate::models::Document;
use crate::prompt::{Announce, Confirm, FixedAnswer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub pair_order: PairOrder,
    /// Drop items from the document once they have been merged into another.
    pub remove_merged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Userless,
    Passwordless,
    Uriless,
    MergedItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: Stage,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub first_id: String,
    pub first_name: String,
    pub second_id: String,
    pub second_name: String,
}

/// What a cleaning run did, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub start_count: usize,
    pub stages: Vec<StageCount>,
    pub removals: Vec<Removal>,
    pub duplicates: Vec<DuplicateRecord>,
    pub merges: Vec<MergeRecord>,
    pub declined: usize,
    pub skipped: usize,
    pub end_count: usize,
}

impl SweepReport {
    pub fn removed_in(&self, stage: Stage) -> usize {
        self.stages
            .iter()
            .filter(|count| count.stage == stage)
            .map(|count| count.removed)
            .sum()
    }
}

/// Filters, then duplicate detection and interactive merge.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub fn run(
        &self,
        doc: &mut Document,
        confirm: &mut dyn Confirm,
        announce: &mut dyn Announce,
    ) -> SweepReport {
        let mut report = SweepReport {
            start_count: doc.len(),
            ..Default::default()
        };
        announce.announce(&format!("Found {} items.", report.start_count));

        let stages: [(Stage, &str, fn(&mut Document, &mut dyn Announce) -> Vec<Removal>); 3] = [
            (Stage::Userless, "a username", filters::remove_userless),
            (Stage::Passwordless, "a password", filters::remove_passwordless),
            (Stage::Uriless, "a URI", filters::remove_uriless),
        ];
        for (stage, missing, filter) in stages {
            let before = doc.len();
            let removed = filter(doc, announce);
            let count = before - doc.len();
            info!(?stage, removed = count, "filter stage finished");
            announce.announce(&format!("Removed {count} items without {missing}."));
            report.stages.push(StageCount {
                stage,
                removed: count,
            });
            report.removals.extend(removed);
        }

        let pairs = DuplicateFinder::new()
            .with_pair_order(self.options.pair_order)
            .find_pairs(doc);
        report.duplicates = pairs
            .iter()
            .map(|pair| {
                let first = &doc.items[pair.first];
                let second = &doc.items[pair.second];
                DuplicateRecord {
                    first_id: first.id.clone(),
                    first_name: first.name.clone(),
                    second_id: second.id.clone(),
                    second_name: second.name.clone(),
                }
            })
            .collect();

        let mut resolver = MergeResolver::new();
        for pair in pairs {
            match resolver.resolve(doc, pair, confirm, announce) {
                MergeOutcome::Merged(record) => report.merges.push(record),
                MergeOutcome::Declined => report.declined += 1,
                MergeOutcome::Skipped => report.skipped += 1,
            }
        }
        info!(
            pairs = report.duplicates.len(),
            merged = report.merges.len(),
            declined = report.declined,
            "duplicate stage finished"
        );

        if self.options.remove_merged {
            let before = doc.len();
            let mut index = 0;
            doc.items.retain(|_| {
                let keep = !resolver.is_merged(index);
                index += 1;
                keep
            });
            let count = before - doc.len();
            announce.announce(&format!("Removed {count} merged items."));
            report.stages.push(StageCount {
                stage: Stage::MergedItems,
                removed: count,
            });
        }

        report.end_count = doc.len();
        announce.announce(&format!(
            "Ending with {} of {} items remaining.",
            report.end_count, report.start_count
        ));
        report
    }

    /// Dry run on a copy: nothing is modified and every merge is declined.
    pub fn check(&self, doc: &Document, announce: &mut dyn Announce) -> SweepReport {
        let mut scratch = doc.clone();
        self.run(&mut scratch, &mut FixedAnswer(false), announce)
    }
}
