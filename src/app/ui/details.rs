use eframe::egui::{self, RichText, Ui};

use crate::util::{format_bytes, format_protocol};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Resource Details");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Clear selection").clicked() {
                    self.set_selected(None);
                }
            });
        });
        ui.add_space(6.0);

        let Some(store) = self.driver.store() else {
            return;
        };
        let Some(index) = self
            .controller
            .selected()
            .and_then(|id| store.index_of_id(id))
        else {
            ui.label("Selected resource is not part of the current analysis.");
            return;
        };
        let Some(node) = store.node(index) else {
            return;
        };

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.url.as_str());
        ui.add_space(6.0);

        egui::Grid::new("resource_details_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Category");
                ui.label(node.kind.label());
                ui.end_row();

                ui.label("Resource size");
                ui.label(format_bytes(node.byte_size));
                ui.end_row();

                ui.label("Transfer size");
                ui.label(
                    node.transfer_size
                        .map(format_bytes)
                        .unwrap_or_else(|| "n/a".to_owned()),
                );
                ui.end_row();

                ui.label("Protocol");
                ui.label(format_protocol(&node.protocol));
                ui.end_row();

                ui.label("Compression");
                ui.label(node.compression.as_str());
                ui.end_row();
            });

        let mut next_selection = None;

        ui.separator();
        ui.label(RichText::new("Initiated by").strong());
        match store.initiator_of(index).and_then(|parent| store.node(parent)) {
            Some(parent) => {
                if ui.link(parent.name.as_str()).on_hover_text(parent.url.as_str()).clicked() {
                    next_selection = Some(parent.id.clone());
                }
            }
            None if store.root_index() == Some(index) => {
                ui.label("Document root");
            }
            None => {
                let reference = node.initiator_ref.as_deref().unwrap_or("none");
                ui.label(format!("Unresolved ({reference})"));
            }
        }

        ui.separator();
        let children = store.children_of(index).collect::<Vec<_>>();
        ui.label(RichText::new(format!("Initiated requests ({})", children.len())).strong());
        if children.is_empty() {
            ui.label("This resource did not trigger other requests.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("initiated_requests_scroll")
                .max_height(320.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for child in children.iter().filter_map(|&child| store.node(child)) {
                        let label = format!("{}  ({})", child.name, format_bytes(child.byte_size));
                        if ui.link(label).on_hover_text(child.url.as_str()).clicked() {
                            next_selection = Some(child.id.clone());
                        }
                    }
                });
        }

        if let Some(id) = next_selection {
            self.set_selected(Some(id));
        }
    }
}
