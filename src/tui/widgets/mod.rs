// TUI widget modules for each screen panel.

pub mod champion_stats;
pub mod help_bar;
pub mod join;
pub mod phase_banner;
pub mod picker;
pub mod queue;
pub mod status_bar;
pub mod teams;
