use eframe::egui::{self, Align, Layout, Ui};

use crate::util::format_bytes;

use super::super::render_utils::kind_fill;
use super::super::ViewModel;

const ROW_HEIGHT: f32 = 22.0;

impl ViewModel {
    /// Indices of the resources passing the category filter, largest first.
    pub(in crate::app) fn list_order(&self) -> Vec<usize> {
        let Some(store) = self.driver.store() else {
            return Vec::new();
        };

        let mut order = store
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| self.filters.contains(node.kind))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        order.sort_by(|a, b| {
            let nodes = store.nodes();
            nodes[*b].byte_size.cmp(&nodes[*a].byte_size).then(a.cmp(b))
        });
        order
    }

    pub(in crate::app) fn draw_resource_list(&mut self, ui: &mut Ui) {
        let order = self.list_order();
        let mut selected_id = None;

        let Some(store) = self.driver.store() else {
            ui.label("No resources loaded.");
            return;
        };
        if order.is_empty() {
            ui.label("No resources match the active categories.");
            return;
        }

        let selected = self.controller.selected();
        egui::ScrollArea::vertical()
            .id_salt("resource_list_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, order.len(), |ui, row_range| {
                for &index in &order[row_range] {
                    let Some(node) = store.node(index) else {
                        continue;
                    };
                    let is_selected = selected == Some(node.id.as_str());

                    let clicked = ui
                        .horizontal(|ui| {
                            let (swatch, _) = ui
                                .allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(swatch.center(), 5.0, kind_fill(node.kind));
                            let clicked = ui
                                .selectable_label(is_selected, node.name.as_str())
                                .on_hover_text(node.url.as_str())
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format_bytes(node.byte_size));
                                ui.label(node.kind.tag());
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        selected_id = Some(node.id.clone());
                    }
                }
            });

        if let Some(id) = selected_id {
            self.set_selected(Some(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::LaunchOptions;
    use crate::app::ViewModel;
    use crate::resources::{Dataset, ResourceKind, ResourceRecord};

    fn record(id: &str, kind: ResourceKind, byte_size: u64) -> ResourceRecord {
        ResourceRecord {
            id: id.to_owned(),
            url: format!("https://site.test/{id}"),
            category: kind,
            byte_size,
            transfer_size: None,
            initiator_ref: (id != "root").then(|| "root".to_owned()),
            protocol_label: "h2".to_owned(),
            compression_label: "Unknown".to_owned(),
        }
    }

    fn model() -> ViewModel {
        let dataset = Dataset::new(
            "test",
            vec![
                record("root", ResourceKind::Html, 10_000),
                record("small.js", ResourceKind::Js, 2_000),
                record("hero.png", ResourceKind::Image, 400_000),
                record("app.js", ResourceKind::Js, 90_000),
            ],
        )
        .expect("unique ids");
        ViewModel::new(
            dataset,
            LaunchOptions {
                elapsed_timing: false,
                seed: Some(3),
            },
            Some("https://site.test"),
        )
    }

    #[test]
    fn list_is_sorted_by_size_descending() {
        let model = model();
        assert_eq!(model.list_order(), vec![2, 3, 0, 1]);
    }

    #[test]
    fn list_honors_category_filter() {
        let mut model = model();
        model.filters.toggle(ResourceKind::Js);
        assert_eq!(model.list_order(), vec![2, 0]);
    }

    #[test]
    fn replacing_the_dataset_clears_selection_and_view() {
        let mut model = model();
        model.set_selected(Some("app.js".to_owned()));
        model.viewport.zoom_in();
        let before = model.loop_token;

        let replacement = Dataset::new("next", vec![record("root", ResourceKind::Html, 1)])
            .expect("unique ids");
        model.replace_dataset(replacement);

        assert!(model.controller.selected().is_none());
        assert!((model.viewport.scale() - 1.0).abs() < 1e-6);
        assert_ne!(model.loop_token, before);
        assert_eq!(model.driver.store().map(|store| store.len()), Some(1));
        assert_eq!(model.url_input, "https://site.test");
    }
}
