//! Dashboard & Progress Summaries
//!
//! Aggregates computed client-side from list and stats endpoints.

use crate::api::{ApiClient, ApiResult};
use crate::format::percentage;
use crate::models::{Activity, ContentStats, KindProgress, User};

/// Counters on the dashboard cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_classes: usize,
    pub total_activities: usize,
    pub total_content: u32,
    pub completed_content: u32,
    pub pending_content: u32,
    pub progress_percentage: f64,
}

impl DashboardStats {
    /// Professors see class and activity counts only
    pub fn for_professor(classes: usize, activities: usize) -> Self {
        Self {
            total_classes: classes,
            total_activities: activities,
            ..Default::default()
        }
    }

    pub fn for_student(classes: usize, activities: usize, stats: &ContentStats) -> Self {
        Self {
            total_classes: classes,
            total_activities: activities,
            total_content: stats.total,
            completed_content: stats.completed,
            pending_content: stats.pending,
            progress_percentage: stats.progress_percentage,
        }
    }
}

/// One row of the per-type breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub label: &'static str,
    pub completed: u32,
    pub total: u32,
}

impl Breakdown {
    fn new(label: &'static str, progress: Option<KindProgress>) -> Self {
        let progress = progress.unwrap_or_default();
        Self {
            label,
            completed: progress.completed,
            total: progress.total,
        }
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.completed, self.total)
    }
}

/// Figures of the progress page
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub total_content: u32,
    pub completed_content: u32,
    pub total_activities: u32,
    pub completed_activities: u32,
    pub by_kind: Vec<Breakdown>,
}

impl ProgressOverview {
    pub fn new(stats: &ContentStats, activities: &[Activity]) -> Self {
        Self {
            total_content: stats.total,
            completed_content: stats.completed,
            total_activities: activities.len() as u32,
            completed_activities: activities
                .iter()
                .filter(|a| a.is_completed.unwrap_or(false))
                .count() as u32,
            by_kind: vec![
                Breakdown::new("Handouts", stats.apostila),
                Breakdown::new("Videos", stats.video),
                Breakdown::new("Links", stats.link),
            ],
        }
    }

    pub fn content_percentage(&self) -> u32 {
        percentage(self.completed_content, self.total_content)
    }

    pub fn activities_percentage(&self) -> u32 {
        percentage(self.completed_activities, self.total_activities)
    }
}

impl ApiClient {
    /// Load the dashboard counters appropriate for `user`
    pub async fn dashboard(&self, user: &User) -> ApiResult<DashboardStats> {
        if user.is_professor() {
            let (classes, activities) = tokio::try_join!(self.classes(), self.activities(None))?;
            Ok(DashboardStats::for_professor(classes.len(), activities.len()))
        } else {
            let (classes, activities, stats) = tokio::try_join!(
                self.classes(),
                self.student_activities(),
                self.content_stats()
            )?;
            Ok(DashboardStats::for_student(classes.len(), activities.len(), &stats))
        }
    }

    /// Load the progress page figures
    pub async fn progress_overview(&self) -> ApiResult<ProgressOverview> {
        let (stats, activities) = tokio::try_join!(self.content_stats(), self.activities(None))?;
        Ok(ProgressOverview::new(&stats, &activities))
    }
}
