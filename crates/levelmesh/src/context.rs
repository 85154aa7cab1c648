//! Context system for pipeline operations providing logging, profiling,
//! and progress tracking
//!
//! A [`BuildContext`] collects log entries and per-stage timings for one
//! or more pipeline runs, so level-load and editor code can report where
//! the time went without wiring up a profiler.

use std::collections::HashMap;
use std::time::Duration;
use web_time::Instant;

/// Log level for context messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug level messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warning messages
    Warning = 2,
    /// Error messages
    Error = 3,
}

/// Timer categories for performance profiling
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerCategory {
    /// Total pipeline time
    Total,
    /// Self-intersection splitting
    SelfIntersection,
    /// Ear-clipping and constrained triangulation
    Triangulation,
    /// Boolean union and offsetting
    Clipping,
    /// Convex mesh building
    MeshBuild,
    /// Binary encode/decode
    Codec,
    /// Custom user-defined timer
    Custom(String),
}

/// Progress information for long-running operations
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Current step number
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Description of current operation
    pub description: String,
}

/// Log entry containing message and metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp when log was created
    pub timestamp: Instant,
    /// Log message
    pub message: String,
    /// Optional category for grouping logs
    pub category: Option<String>,
}

/// Timer entry for performance measurement
#[derive(Debug, Clone)]
pub struct TimerEntry {
    /// Timer category
    pub category: TimerCategory,
    /// Accumulated duration
    pub duration: Duration,
    /// Number of times this timer was used
    pub count: usize,
}

/// Context for pipeline operations providing logging, profiling, and
/// progress tracking
#[derive(Debug)]
pub struct BuildContext {
    /// Log entries
    logs: Vec<LogEntry>,
    /// Active timers
    active_timers: HashMap<TimerCategory, Instant>,
    /// Completed timer entries
    timers: HashMap<TimerCategory, TimerEntry>,
    /// Current progress information
    progress: Option<ProgressInfo>,
    /// Minimum log level to record
    min_log_level: LogLevel,
    /// Whether to enable performance timing
    enable_timing: bool,
    /// Maximum number of log entries to keep
    max_log_entries: usize,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    /// Creates a new build context with default settings
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            active_timers: HashMap::new(),
            timers: HashMap::new(),
            progress: None,
            min_log_level: LogLevel::Info,
            enable_timing: true,
            max_log_entries: 1000,
        }
    }

    /// Sets the minimum log level
    pub fn set_log_level(&mut self, level: LogLevel) {
        self.min_log_level = level;
    }

    /// Enables or disables performance timing
    pub fn set_timing_enabled(&mut self, enabled: bool) {
        self.enable_timing = enabled;
    }

    /// Sets the maximum number of log entries to keep
    pub fn set_max_log_entries(&mut self, max_entries: usize) {
        self.max_log_entries = max_entries;
    }

    /// Logs a debug message
    pub fn log_debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None);
    }

    /// Logs an info message
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    /// Logs a warning message
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message, None);
    }

    /// Logs an error message
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None);
    }

    /// Logs a message with a category for grouping
    pub fn log_with_category(
        &mut self,
        level: LogLevel,
        message: impl Into<String>,
        category: impl Into<String>,
    ) {
        self.log(level, message, Some(category.into()));
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>, category: Option<String>) {
        if level >= self.min_log_level {
            let entry = LogEntry {
                level,
                timestamp: Instant::now(),
                message: message.into(),
                category,
            };

            self.logs.push(entry);

            // Trim logs if we exceed the maximum
            if self.logs.len() > self.max_log_entries {
                self.logs.remove(0);
            }
        }
    }

    /// Starts a timer for the given category
    pub fn start_timer(&mut self, category: TimerCategory) {
        if self.enable_timing {
            self.active_timers.insert(category, Instant::now());
        }
    }

    /// Stops a timer and accumulates the duration
    pub fn stop_timer(&mut self, category: TimerCategory) {
        if !self.enable_timing {
            return;
        }
        if let Some(start_time) = self.active_timers.remove(&category) {
            let duration = start_time.elapsed();
            let entry = self.timers.entry(category.clone()).or_insert(TimerEntry {
                category,
                duration: Duration::ZERO,
                count: 0,
            });
            entry.duration += duration;
            entry.count += 1;
        }
    }

    /// Gets the elapsed time for an active timer
    pub fn get_timer_elapsed(&self, category: &TimerCategory) -> Option<Duration> {
        if self.enable_timing {
            self.active_timers
                .get(category)
                .map(|start| start.elapsed())
        } else {
            None
        }
    }

    /// Gets the accumulated duration for a completed timer
    pub fn get_timer_duration(&self, category: &TimerCategory) -> Option<Duration> {
        self.timers.get(category).map(|entry| entry.duration)
    }

    /// Gets the count for a timer (how many times it was used)
    pub fn get_timer_count(&self, category: &TimerCategory) -> usize {
        self.timers
            .get(category)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Updates progress information
    pub fn set_progress(&mut self, current: usize, total: usize, description: impl Into<String>) {
        self.progress = Some(ProgressInfo {
            current,
            total,
            description: description.into(),
        });
    }

    /// Clears progress information
    pub fn clear_progress(&mut self) {
        self.progress = None;
    }

    /// Gets current progress information
    pub fn get_progress(&self) -> Option<&ProgressInfo> {
        self.progress.as_ref()
    }

    /// Gets all log entries
    pub fn get_logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Gets log entries for a specific level
    pub fn get_logs_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.logs
            .iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// Gets all timer entries
    pub fn get_timers(&self) -> &HashMap<TimerCategory, TimerEntry> {
        &self.timers
    }

    /// Resets the context (clears logs, timers, and progress)
    pub fn reset(&mut self) {
        self.logs.clear();
        self.active_timers.clear();
        self.timers.clear();
        self.progress = None;
    }

    /// Prints a summary of performance timers
    pub fn print_timer_summary(&self) {
        println!("=== Pipeline Performance Summary ===");

        let mut sorted_timers: Vec<_> = self.timers.iter().collect();
        sorted_timers.sort_by(|a, b| b.1.duration.cmp(&a.1.duration));

        for (category, entry) in sorted_timers {
            println!(
                "{:20} {:8.2}ms ({} calls, avg: {:.2}ms)",
                format!("{:?}", category),
                entry.duration.as_secs_f64() * 1000.0,
                entry.count,
                entry.duration.as_secs_f64() * 1000.0 / entry.count.max(1) as f64
            );
        }
    }
}

/// Timer guard that stops timing when handed back to the context
pub struct TimerGuard {
    category: TimerCategory,
    started: bool,
}

impl TimerGuard {
    /// Creates a new timer guard and starts timing
    pub fn new(context: &mut BuildContext, category: TimerCategory) -> Self {
        context.start_timer(category.clone());
        Self {
            category,
            started: true,
        }
    }

    /// Stops the timer
    pub fn stop(mut self, context: &mut BuildContext) {
        if self.started {
            context.stop_timer(self.category.clone());
            self.started = false;
        }
    }

    /// Get the category of this timer
    pub fn category(&self) -> &TimerCategory {
        &self.category
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        // The timer stays active if the guard is dropped without stop();
        // flag it so the leak is visible during development.
        if self.started {
            log::warn!(
                "TimerGuard for {:?} was dropped without being stopped",
                self.category
            );
        }
    }
}
