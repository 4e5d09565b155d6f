use eframe::egui::{self, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search article titles")
            .on_hover_text("Fuzzy-highlight matching articles without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        let mut changed = false;

        changed |= ui
            .add(
                egui::Slider::new(&mut self.sim.repulsion, 2_000.0..=60_000.0)
                    .text("Repulsion")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly articles push away from each other.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut self.sim.link_distance, 20.0..=300.0)
                    .text("Link distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Natural length similar articles settle at.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut self.sim.center_pull, 0.0..=0.1)
                    .text("Center pull")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Drift correction toward the canvas center.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut self.sim.velocity_decay, 0.3..=0.95)
                    .text("Velocity decay")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of velocity carried into the next step.")
            .changed();

        if changed {
            // Tuning while settled should be visible immediately.
            self.layout.alpha = 1.0;
        }

        ui.separator();

        ui.checkbox(&mut self.show_labels, "Show titles")
            .on_hover_text("Draw article titles next to nodes when zoomed in.");

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .button("Reheat")
                .on_hover_text("Restore full simulation temperature and let the layout re-settle.")
                .clicked()
            {
                self.layout.alpha = 1.0;
            }

            if ui
                .button("Restart layout")
                .on_hover_text("Rebuild the layout from the loaded document, unpinning everything.")
                .clicked()
            {
                self.restart_layout();
            }
        });

        ui.separator();

        ui.label(format!("alpha: {:.4}", self.layout.alpha));
        ui.label(format!("pinned: {}", self.layout.pinned_count()));
        if self.dropped_links > 0 {
            ui.label(format!("dropped links: {}", self.dropped_links));
        }
        ui.add_space(4.0);
        ui.small("Drag a node to pin it; click a pinned node to release it.");
        ui.small("Right or middle drag pans; scroll zooms.");
    }
}
