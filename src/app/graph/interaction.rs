use std::collections::VecDeque;

use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::render_utils::screen_to_world;
use super::super::{Canvas, LayoutGraph, Pin, PointerCommand, ViewModel};

impl LayoutGraph {
    /// Drains the pointer command queue, applied before the next force pass
    /// so the simulation step and the handlers never write concurrently.
    ///
    /// Drag pins the node at the pointed-to position, clamped to the canvas;
    /// click releases an existing pin. Either transition reheats the
    /// simulation so the layout re-settles around the change.
    pub(in crate::app) fn apply_commands(
        &mut self,
        commands: &mut VecDeque<PointerCommand>,
        canvas: Canvas,
    ) {
        while let Some(command) = commands.pop_front() {
            match command {
                PointerCommand::Drag { index, point } => {
                    let Some(node) = self.nodes.get_mut(index) else {
                        continue;
                    };
                    let clamped = canvas.clamp(point);
                    node.pin = Pin::Pinned(clamped);
                    node.position = clamped;
                    node.velocity = egui::Vec2::ZERO;
                    self.alpha = 1.0;
                }
                PointerCommand::Click { index } => {
                    let Some(node) = self.nodes.get_mut(index) else {
                        continue;
                    };
                    if node.pin.is_pinned() {
                        node.pin = Pin::Free;
                        self.alpha = 1.0;
                    }
                }
            }
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, self.canvas.center(), pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan =
            pointer - rect.center() - ((world_before - self.canvas.center()) * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        node_screen_radius: f32,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        visible_indices
            .iter()
            .filter_map(|&index| {
                let distance = screen_positions[index].distance(pointer);
                (distance <= node_screen_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Translates this frame's pointer activity into queued commands. A
    /// primary drag that starts on a node pins and follows it; a primary
    /// click selects, and on a pinned node also releases the pin.
    pub(in crate::app) fn queue_pointer_commands(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            self.dragging = hovered;
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.dragging = None;
        }

        if let Some(index) = self.dragging
            && response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = ui.input(|input| input.pointer.interact_pos())
        {
            let point = screen_to_world(rect, self.pan, self.zoom, self.canvas.center(), pointer);
            self.commands.push_back(PointerCommand::Drag { index, point });
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            if let Some(index) = hovered {
                self.commands.push_back(PointerCommand::Click { index });
                self.selected = Some(index);
            } else {
                self.selected = None;
            }
        }
    }
}
