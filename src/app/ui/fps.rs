use eframe::egui::Context;

use super::super::ViewModel;

const FPS_SAMPLE_WINDOW: usize = 180;
const STEP_RATE_WINDOW_SECS: f64 = 1.0;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        let (dt, now) = ctx.input(|input| (input.stable_dt, input.time));

        self.step_samples.push_back((now, self.driver.steps()));
        while self
            .step_samples
            .front()
            .is_some_and(|(time, _)| now - time > STEP_RATE_WINDOW_SECS)
        {
            self.step_samples.pop_front();
        }

        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    /// Simulation steps per second over the last sampling window.
    pub(in crate::app) fn step_rate(&self) -> Option<f64> {
        let (first_time, first_steps) = self.step_samples.front()?;
        let (last_time, last_steps) = self.step_samples.back()?;
        let span = last_time - first_time;
        if span <= f64::EPSILON {
            return None;
        }
        Some(last_steps.saturating_sub(*first_steps) as f64 / span)
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];

        if !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {:.1}", avg));
        }

        if self.fps_current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        }

        if let Some(rate) = self.step_rate() {
            parts.push(format!("{rate:.0} steps/s"));
        }

        Some(parts.join(" | "))
    }

    pub(in crate::app) fn visible_graph_text(&self) -> String {
        format!(
            "visible: {} nodes / {} links",
            self.visible_node_count, self.visible_link_count
        )
    }
}
