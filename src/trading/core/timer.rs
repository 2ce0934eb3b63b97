use std::time::Instant;

use log::debug;

use super::launcher::LaunchStage;

/// Launch stage timer
pub struct LaunchTimer {
    start_time: Instant,
    stage: Option<LaunchStage>,
}

impl LaunchTimer {
    pub fn new(stage: LaunchStage) -> Self {
        Self {
            start_time: Instant::now(),
            stage: Some(stage),
        }
    }

    /// Logs how long the current stage took and starts timing `new_stage`
    pub fn stage(&mut self, new_stage: LaunchStage) {
        self.log_elapsed();
        self.start_time = Instant::now();
        self.stage = Some(new_stage);
    }

    pub fn finish(mut self) {
        self.log_elapsed();
        self.stage = None;
    }

    fn log_elapsed(&self) {
        if let Some(stage) = self.stage {
            debug!("{} took {:?}", stage, self.start_time.elapsed());
        }
    }
}

impl Drop for LaunchTimer {
    fn drop(&mut self) {
        // a stage still set here means the pipeline bailed out of it
        if let Some(stage) = self.stage {
            debug!("{} aborted after {:?}", stage, self.start_time.elapsed());
        }
    }
}
