/// Aggregated view of a running session, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub is_last: bool,
    pub remaining_secs: u32,
    pub is_time_critical: bool,
}
