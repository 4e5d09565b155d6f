use eframe::egui::{self, RichText, Ui};

use super::super::{Pin, ViewModel};

struct RelatedRow {
    index: usize,
    title: String,
    distance: f32,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Article Details");
        ui.add_space(6.0);

        let Some(selected) = self.selected else {
            ui.label("Select an article in the graph.");
            return;
        };
        let Some(node) = self.layout.nodes.get(selected) else {
            ui.label("Selection no longer exists in the current layout.");
            return;
        };

        ui.label(RichText::new(node.title.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Published: {}", node.published_date));
        match node.pin {
            Pin::Free => ui.label("Position: free"),
            Pin::Pinned(point) => {
                ui.label(format!("Position: pinned at ({:.0}, {:.0})", point.x, point.y))
            }
        };

        let mut related = self.layout.adjacency[selected]
            .iter()
            .map(|&(index, distance)| RelatedRow {
                index,
                title: self.layout.nodes[index].title.clone(),
                distance,
            })
            .collect::<Vec<_>>();
        related.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.title.cmp(&b.title))
        });

        ui.separator();
        ui.label(RichText::new("Related articles").strong());
        if related.is_empty() {
            ui.label("No links touch this article.");
            return;
        }

        let mut next_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("related_articles_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in &related {
                    let label = format!("{}  ({:.3})", row.title, row.distance);
                    if ui
                        .link(label)
                        .on_hover_text(self.layout.nodes[row.index].id.as_str())
                        .clicked()
                    {
                        next_selection = Some(row.index);
                    }
                }
            });

        if let Some(index) = next_selection {
            self.selected = Some(index);
        }
    }
}
