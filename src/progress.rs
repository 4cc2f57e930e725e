// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Terminal spinner reporting pipeline stages.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.yellow} [{elapsed_precise}] {msg}";
const TICK: Duration = Duration::from_millis(100,);

/// Stage spinner; hidden in tests and non-interactive runs.
#[derive(Debug, Clone,)]
pub struct Progress
{
    bar: ProgressBar,
}

impl Progress
{
    /// Creates a visible spinner drawn on stderr.
    pub fn spinner() -> Self
    {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE,)
            .unwrap_or_else(|_| ProgressStyle::default_spinner(),);
        bar.set_style(style,);
        bar.enable_steady_tick(TICK,);
        Self {
            bar,
        }
    }

    /// Creates a spinner that draws nothing.
    pub fn hidden() -> Self
    {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Announces the stage now running.
    pub fn stage(&self, message: impl Into<String,>,)
    {
        self.bar.set_message(message.into(),);
    }

    /// Stops the spinner, leaving `message` on screen.
    pub fn finish(&self, message: impl Into<String,>,)
    {
        self.bar.finish_with_message(message.into(),);
    }

    /// Stops the spinner and clears it.
    pub fn abandon(&self,)
    {
        self.bar.finish_and_clear();
    }
}
