use std::collections::VecDeque;
use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::graph::KnowledgeGraph;

use super::super::graph::build_layout;
use super::super::{Canvas, SimConfig, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(document: KnowledgeGraph, canvas: Canvas) -> Self {
        let (layout, dropped_links) = build_layout(&document, canvas);
        if dropped_links > 0 {
            tracing::warn!(dropped_links, "document contained unrenderable links");
        }

        Self {
            document,
            canvas,
            layout,
            layout_revision: 0,
            dropped_links,
            selected: None,
            dragging: None,
            commands: VecDeque::new(),
            search: String::new(),
            search_match_cache: None,
            pan: Vec2::ZERO,
            zoom: 0.45,
            sim: SimConfig::default(),
            show_labels: true,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    /// Throws away the working copy and rebuilds it from the loaded
    /// document, returning every node to its initial free position.
    pub(in crate::app) fn restart_layout(&mut self) {
        let (layout, dropped_links) = build_layout(&self.document, self.canvas);
        self.layout = layout;
        self.dropped_links = dropped_links;
        self.layout_revision = self.layout_revision.wrapping_add(1);
        self.search_match_cache = None;
        self.selected = None;
        self.dragging = None;
        self.commands.clear();
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("knograph");
                    ui.separator();
                    ui.label(format!("document: {}", graph_path.display()));
                    ui.label(format!("articles: {}", self.document.node_count()));
                    ui.label(format!("links: {}", self.document.link_count()));
                    if self.dropped_links > 0 {
                        ui.colored_label(
                            egui::Color32::from_rgb(240, 160, 80),
                            format!("{} links dropped", self.dropped_links),
                        );
                    }

                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload document"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible {} / {}",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        ui.label(format!("alpha {:.3}", self.layout.alpha));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading knowledge graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
