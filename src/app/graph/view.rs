use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::short_title;

use super::super::physics::step_simulation;
use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, draw_canvas_frame, edge_color,
    edge_visible, world_to_screen,
};
use super::super::{LayoutGraph, SearchMatchCache, ViewModel};

pub(in crate::app) const NODE_RADIUS: f32 = 12.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl LayoutGraph {
    fn update_screen_space(
        &mut self,
        rect: Rect,
        pan: Vec2,
        zoom: f32,
        canvas_center: Vec2,
        node_screen_radius: f32,
    ) {
        let scratch = &mut self.view_scratch;
        scratch.screen_positions.clear();
        scratch
            .screen_positions
            .reserve(self.nodes.len().saturating_sub(scratch.screen_positions.capacity()));
        for node in &self.nodes {
            scratch
                .screen_positions
                .push(world_to_screen(rect, pan, zoom, canvas_center, node.position));
        }

        scratch.visible_indices.clear();
        scratch.visible_indices.extend((0..self.nodes.len()).filter(|&index| {
            circle_visible(rect, scratch.screen_positions[index], node_screen_radius)
        }));
    }

    fn value_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for link in &self.links {
            min = min.min(link.value);
            max = max.max(link.value);
        }
        if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 1.0)
        }
    }
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cache) = &self.search_match_cache
            && cache.layout_revision == self.layout_revision
            && cache.query == query
        {
            return Some(Arc::clone(&cache.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .layout
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.title, query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            layout_revision: self.layout_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let canvas_center = self.canvas.center();
        draw_canvas_frame(
            &painter,
            rect,
            self.pan,
            self.zoom,
            canvas_center,
            vec2(self.canvas.width, self.canvas.height),
        );

        let node_screen_radius = (NODE_RADIUS * self.zoom).clamp(3.0, 34.0);

        // Hit-test against the pre-step positions the pointer actually sees.
        self.layout
            .update_screen_space(rect, self.pan, self.zoom, canvas_center, node_screen_radius);
        let hovered = Self::hovered_index(
            ui,
            &self.layout.view_scratch.visible_indices,
            &self.layout.view_scratch.screen_positions,
            node_screen_radius,
        );

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        self.queue_pointer_commands(ui, rect, &response, hovered);

        // Single writer per tick: drain the queued interactions, then run
        // the force pass, then render the resulting state.
        self.layout.apply_commands(&mut self.commands, self.canvas);
        let simulation_active = step_simulation(&mut self.layout, self.canvas, self.sim);
        if simulation_active || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.layout
            .update_screen_space(rect, self.pan, self.zoom, canvas_center, node_screen_radius);
        self.visible_node_count = self.layout.view_scratch.visible_indices.len();

        let search_matches = self.cached_search_matches();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        let neighbor_highlight = self.selected.map(|selected| {
            self.layout.adjacency[selected]
                .iter()
                .map(|&(neighbor, _)| neighbor)
                .collect::<HashSet<_>>()
        });

        let (value_min, value_max) = self.layout.value_range();
        let screen_positions = &self.layout.view_scratch.screen_positions;

        let mut visible_edge_count = 0usize;
        for link in &self.layout.links {
            let start = screen_positions[link.source];
            let end = screen_positions[link.target];
            if !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let incident = self.selected
                .is_some_and(|selected| selected == link.source || selected == link.target);
            let (width, color) = if incident {
                (
                    (2.4 * self.zoom.sqrt()).clamp(1.2, 4.2),
                    Color32::from_rgb(241, 146, 94),
                )
            } else {
                let base = edge_color(link.value, value_min, value_max);
                let color = if self.selected.is_some() {
                    dim_color(base, 0.45)
                } else {
                    base
                };
                ((1.1 * self.zoom.sqrt()).clamp(0.5, 3.0), color)
            };

            painter.line_segment([start, end], Stroke::new(width, color));
            visible_edge_count += 1;
        }
        self.visible_edge_count = visible_edge_count;

        let base_color = Color32::from_rgb(96, 156, 214);
        let selected_color = Color32::from_rgb(245, 206, 93);

        for &index in &self.layout.view_scratch.visible_indices {
            let node = &self.layout.nodes[index];
            let position = screen_positions[index];

            let is_selected = self.selected == Some(index);
            let is_hovered = hovered == Some(index);
            let is_neighbor = neighbor_highlight
                .as_ref()
                .is_some_and(|neighbors| neighbors.contains(&index));
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let color = if is_selected {
                selected_color
            } else if is_hovered {
                Color32::from_rgb(255, 164, 101)
            } else if is_neighbor {
                blend_color(base_color, Color32::from_rgb(246, 137, 92), 0.6)
            } else if is_match {
                blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.68)
            } else if self.selected.is_some() {
                dim_color(base_color, 0.5)
            } else if search_active {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            painter.circle_filled(position, node_screen_radius, color);
            painter.circle_stroke(
                position,
                node_screen_radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            // Pinned nodes carry an accent ring so the fixed anchors stand
            // out from free-floating nodes.
            if node.pin.is_pinned() {
                painter.circle_stroke(
                    position,
                    node_screen_radius + 3.0,
                    Stroke::new(2.0, Color32::from_rgb(240, 120, 120)),
                );
            }

            let should_label = is_selected
                || is_hovered
                || (is_match && self.zoom > 0.4)
                || (self.show_labels && self.zoom > 0.9);
            if should_label {
                painter.text(
                    position + vec2(node_screen_radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_title(&node.title, 36),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered {
            let node = &self.layout.nodes[index];
            let status = if node.pin.is_pinned() { "pinned" } else { "free" };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {} links  |  {status}",
                    node.title,
                    node.published_date,
                    self.layout.adjacency[index].len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
