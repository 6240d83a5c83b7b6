use eframe::egui::{self, Color32, RichText};
use marmat_common::table::PREVIEW_ROWS;
use marmat_common::{Delimiter, Event, MatchMode, Screen, Session, Settings};

use crate::io;
use crate::model::{AppState, Notice, NoticeKind};

const DELIMITERS: [Delimiter; 5] = [
    Delimiter::Comma,
    Delimiter::Tab,
    Delimiter::Semicolon,
    Delimiter::Space,
    Delimiter::Pipe,
];

/// グリッドのセル表示幅（文字数）
const CELL_CHARS: usize = 48;

const INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "1. Load metadata",
        "Choose a CSV, TSV or Excel file. The first row must hold column names. \
         A preview of the first rows is shown so you can check the columns were read correctly.",
    ),
    (
        "2. Load lexicon",
        "Choose a lexicon file with a Term column and a Category column. \
         Every category found in the file is listed with its number of terms.",
    ),
    (
        "3. Select data",
        "Pick the column that identifies each record, the metadata fields to check \
         and the lexicon categories to look for. Matching ignores case. \
         By default a term also matches inside longer words; tick the whole-word box to prevent that.",
    ),
    (
        "4. Perform analysis",
        "Choose where to save the results and run the analysis. Each row of the output \
         names the record, the field, the matched term, its category and the original field text.",
    ),
];

enum Action {
    Dispatch(Event),
    LoadMetadata,
    LoadLexicon,
    PickOutput,
    Analyze,
    PickFolder(Folder),
    SettingsChanged,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum Folder {
    Metadata,
    Lexicon,
    Results,
}

pub struct MarmatApp {
    session: Session,
    settings: Settings,
    state: AppState,
}

impl MarmatApp {
    pub fn new(settings: Settings) -> Self {
        let state = AppState {
            output_path: io::default_output_path(&settings),
            ..AppState::default()
        };
        Self { session: Session::new(), settings, state }
    }

    fn notify(&mut self, notice: Notice) {
        self.state.notify(notice, self.settings.popups_enabled);
    }

    fn fail(&mut self, err: &anyhow::Error) {
        self.notify(Notice::from_error(err));
    }

    fn apply(&mut self, action: Action, ctx: &egui::Context) {
        match action {
            Action::Dispatch(event) => match self.session.dispatch(event) {
                Ok(_) => {
                    if event == Event::Finish {
                        self.state.report = None;
                    }
                    self.state.status.clear();
                }
                Err(err) => self.fail(&anyhow::Error::from(err)),
            },
            Action::LoadMetadata => {
                let Some(path) = io::pick_table("Select metadata file", &self.settings.default_metadata_dir)
                else {
                    return;
                };
                match io::load_metadata(&mut self.session, &path, self.state.delimiter) {
                    Ok(message) => {
                        self.state.report = None;
                        self.state.status = message;
                    }
                    Err(err) => self.fail(&err),
                }
            }
            Action::LoadLexicon => {
                let Some(path) = io::pick_table("Select lexicon file", &self.settings.default_lexicon_dir)
                else {
                    return;
                };
                match io::load_lexicon(&mut self.session, &path) {
                    Ok(message) => {
                        self.state.report = None;
                        self.state.status = message;
                    }
                    Err(err) => self.fail(&err),
                }
            }
            Action::PickOutput => {
                if let Some(path) = io::pick_output(&self.state.output_path) {
                    self.state.output_path = path;
                }
            }
            Action::Analyze => match io::analyze_and_save(&mut self.session, &self.state.output_path) {
                Ok(report) => {
                    let message = if report.summary.matches == 0 {
                        format!("No matches found. Empty {} saved to {}", report.format, report.output.display())
                    } else {
                        format!(
                            "{} matches in {} records. {} saved to {}",
                            report.summary.matches,
                            report.summary.records,
                            report.format,
                            report.output.display()
                        )
                    };
                    self.state.output_path = report.output.clone();
                    self.state.report = Some(report);
                    self.notify(Notice::info(message));
                }
                Err(err) => self.fail(&err),
            },
            Action::PickFolder(folder) => {
                let current = match folder {
                    Folder::Metadata => &self.settings.default_metadata_dir,
                    Folder::Lexicon => &self.settings.default_lexicon_dir,
                    Folder::Results => &self.settings.default_results_dir,
                };
                let Some(dir) = io::pick_folder(current) else {
                    return;
                };
                match folder {
                    Folder::Metadata => self.settings.default_metadata_dir = dir,
                    Folder::Lexicon => self.settings.default_lexicon_dir = dir,
                    Folder::Results => {
                        self.settings.default_results_dir = dir;
                        self.state.output_path = io::default_output_path(&self.settings);
                    }
                }
                self.save_settings();
            }
            Action::SettingsChanged => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.settings.fullscreen_enabled));
                self.save_settings();
            }
            Action::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn save_settings(&mut self) {
        match io::save_settings(&self.settings) {
            Ok(()) => self.state.status = "Settings saved".to_string(),
            Err(err) => self.fail(&err),
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new("MaRMAT").size(36.0).strong());
            ui.label("Reparative Metadata Assessment Tool");
            ui.add_space(8.0);
            ui.label(
                RichText::new("Find potentially harmful language in your collection metadata.")
                    .color(Color32::from_gray(170)),
            );
            ui.add_space(30.0);

            let size = egui::vec2(220.0, 32.0);
            if ui.add(egui::Button::new("Start").min_size(size)).clicked() {
                *action = Some(Action::Dispatch(Event::Start));
            }
            if ui.add(egui::Button::new("Instructions").min_size(size)).clicked() {
                *action = Some(Action::Dispatch(Event::OpenInstructions));
            }
            if ui.add(egui::Button::new("Settings").min_size(size)).clicked() {
                *action = Some(Action::Dispatch(Event::OpenSettings));
            }
            if ui.add(egui::Button::new("Quit").min_size(size)).clicked() {
                *action = Some(Action::Quit);
            }
        });
    }

    fn render_settings(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        if ui
            .checkbox(&mut self.settings.popups_enabled, "Show pop-up messages")
            .changed()
        {
            *action = Some(Action::SettingsChanged);
        }
        if ui
            .checkbox(&mut self.settings.fullscreen_enabled, "Start in full screen")
            .changed()
        {
            *action = Some(Action::SettingsChanged);
        }
        ui.add_space(12.0);

        egui::Grid::new("settings_dirs").num_columns(3).spacing([12.0, 8.0]).show(ui, |ui| {
            for (label, folder, dir) in [
                ("Metadata folder", Folder::Metadata, &self.settings.default_metadata_dir),
                ("Lexicon folder", Folder::Lexicon, &self.settings.default_lexicon_dir),
                ("Results folder", Folder::Results, &self.settings.default_results_dir),
            ] {
                ui.label(RichText::new(label).strong());
                ui.label(dir.display().to_string());
                if ui.button("Browse...").clicked() {
                    *action = Some(Action::PickFolder(folder));
                }
                ui.end_row();
            }
        });
    }

    fn render_instructions(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (heading, body) in INSTRUCTIONS {
                ui.label(RichText::new(*heading).strong().size(16.0));
                ui.label(*body);
                ui.add_space(10.0);
            }
        });
    }

    fn render_load_metadata(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        ui.horizontal(|ui| {
            if ui.button("Browse...").clicked() {
                *action = Some(Action::LoadMetadata);
            }
            let label = self
                .state
                .delimiter
                .map_or_else(|| "Auto".to_string(), |d| d.to_string());
            egui::ComboBox::from_label("Delimiter")
                .selected_text(label)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.state.delimiter, None, "Auto (from extension)");
                    for delimiter in DELIMITERS {
                        ui.selectable_value(&mut self.state.delimiter, Some(delimiter), delimiter.to_string());
                    }
                });
        });
        if let Some(path) = self.session.metadata_path() {
            ui.label(RichText::new(path.display().to_string()).color(Color32::from_gray(170)));
        }
        ui.separator();

        let Some(table) = self.session.metadata() else {
            ui.label("No metadata loaded.");
            return;
        };
        ui.label(format!(
            "{} records, {} columns. Showing up to {} rows.",
            table.len(),
            table.headers().len(),
            PREVIEW_ROWS
        ));
        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("metadata_preview").striped(true).show(ui, |ui| {
                for header in table.headers() {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for row in table.preview(PREVIEW_ROWS) {
                    for cell in row {
                        ui.label(clip(cell));
                    }
                    ui.end_row();
                }
            });
        });
    }

    fn render_load_lexicon(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        if ui.button("Browse...").clicked() {
            *action = Some(Action::LoadLexicon);
        }
        if let Some(path) = self.session.lexicon_path() {
            ui.label(RichText::new(path.display().to_string()).color(Color32::from_gray(170)));
        }
        ui.separator();

        let Some(lexicon) = self.session.lexicon() else {
            ui.label("No lexicon loaded.");
            return;
        };
        ui.label(format!("{} terms", lexicon.len()));
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("lexicon_categories").striped(true).show(ui, |ui| {
                ui.label(RichText::new("Category").strong());
                ui.label(RichText::new("Terms").strong());
                ui.end_row();
                for (category, count) in lexicon.category_counts() {
                    ui.label(category);
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
        });
    }

    fn render_data_selection(&mut self, ui: &mut egui::Ui) {
        let headers: Vec<String> = self
            .session
            .metadata()
            .map(|t| t.headers().to_vec())
            .unwrap_or_default();
        let categories: Vec<(String, usize)> = self
            .session
            .lexicon()
            .map(|l| {
                l.category_counts()
                    .into_iter()
                    .map(|(c, n)| (c.to_string(), n))
                    .collect()
            })
            .unwrap_or_default();
        let selection = &mut self.session.selection;

        let current = selection.identifier.clone().unwrap_or_default();
        egui::ComboBox::from_label("Identifier column")
            .selected_text(current.clone())
            .show_ui(ui, |ui| {
                for header in &headers {
                    if ui.selectable_label(current == *header, header.as_str()).clicked() {
                        selection.set_identifier(header);
                    }
                }
            });

        let mut whole_word = selection.mode == MatchMode::WholeWord;
        if ui.checkbox(&mut whole_word, "Match whole words only").changed() {
            selection.mode = if whole_word { MatchMode::WholeWord } else { MatchMode::Substring };
        }
        ui.separator();

        let fields: Vec<String> = headers
            .iter()
            .filter(|h| Some(h.as_str()) != selection.identifier.as_deref())
            .cloned()
            .collect();

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.label(RichText::new("Metadata fields").strong());
            ui.horizontal(|ui| {
                if ui.small_button("Select all").clicked() {
                    selection.set_columns(&fields);
                }
                if ui.small_button("Clear").clicked() {
                    selection.columns.clear();
                }
            });
            egui::ScrollArea::vertical().id_source("fields").show(ui, |ui| {
                for field in &fields {
                    let mut checked = selection.has_column(field);
                    if ui.checkbox(&mut checked, field.as_str()).changed() {
                        selection.toggle_column(field);
                    }
                }
            });

            let ui = &mut columns[1];
            ui.label(RichText::new("Lexicon categories").strong());
            ui.horizontal(|ui| {
                if ui.small_button("Select all").clicked() {
                    let names: Vec<&str> = categories.iter().map(|(c, _)| c.as_str()).collect();
                    selection.set_categories(&names);
                }
                if ui.small_button("Clear").clicked() {
                    selection.categories.clear();
                }
            });
            egui::ScrollArea::vertical().id_source("categories").show(ui, |ui| {
                for (category, count) in &categories {
                    let mut checked = selection.has_category(category);
                    if ui.checkbox(&mut checked, format!("{category} ({count})")).changed() {
                        selection.toggle_category(category);
                    }
                }
            });
        });
    }

    fn render_results(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        let selection = &self.session.selection;
        egui::Grid::new("analysis_inputs").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label(RichText::new("Identifier").strong());
            ui.label(selection.identifier.as_deref().unwrap_or("-"));
            ui.end_row();
            ui.label(RichText::new("Fields").strong());
            ui.label(selection.columns.join(", "));
            ui.end_row();
            ui.label(RichText::new("Categories").strong());
            ui.label(selection.categories.join(", "));
            ui.end_row();
            ui.label(RichText::new("Mode").strong());
            ui.label(selection.mode.to_string());
            ui.end_row();
            ui.label(RichText::new("Output").strong());
            ui.horizontal(|ui| {
                ui.label(self.state.output_path.display().to_string());
                if ui.small_button("Change...").clicked() {
                    *action = Some(Action::PickOutput);
                }
            });
            ui.end_row();
        });

        ui.add_space(8.0);
        if ui.button(RichText::new("Perform Analysis").strong()).clicked() {
            *action = Some(Action::Analyze);
        }
        ui.separator();

        let (Some(report), Some(results)) = (&self.state.report, self.session.results()) else {
            return;
        };
        ui.label(format!(
            "{} matches in {} records",
            report.summary.matches, report.summary.records
        ));
        ui.horizontal_wrapped(|ui| {
            for (category, count) in &report.summary.by_category {
                ui.label(RichText::new(format!("{category}: {count}")).color(Color32::from_rgb(246, 196, 69)));
            }
        });
        if results.len() > PREVIEW_ROWS {
            ui.label(format!("Showing the first {} rows", PREVIEW_ROWS));
        }

        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("results").striped(true).show(ui, |ui| {
                for header in marmat_common::RESULT_HEADERS {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for result in results.iter().take(PREVIEW_ROWS) {
                    ui.label(result.record_id.as_str());
                    ui.label(result.field_name.as_str());
                    ui.label(result.term.as_str());
                    ui.label(result.category.as_str());
                    ui.label(clip(&result.original_contents));
                    ui.end_row();
                }
            });
        });
    }

    fn render_navigation(&self, ui: &mut egui::Ui, screen: Screen, action: &mut Option<Action>) {
        ui.horizontal(|ui| {
            if ui.button("Back").clicked() {
                *action = Some(Action::Dispatch(Event::Back));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if screen == Screen::Results {
                    if ui.button("Finish").clicked() {
                        *action = Some(Action::Dispatch(Event::Finish));
                    }
                } else if screen.step().is_some() && ui.button("Next").clicked() {
                    *action = Some(Action::Dispatch(Event::Next));
                }
            });
        });
    }

    fn render_popup(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.state.popup else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Info => Color32::from_gray(220),
            NoticeKind::Warning => Color32::from_rgb(246, 196, 69),
            NoticeKind::Error => Color32::from_rgb(235, 100, 90),
        };

        let mut close = false;
        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&notice.message).color(color));
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        if close {
            self.state.dismiss_popup();
        }
    }
}

impl eframe::App for MarmatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen = self.session.screen();
        let mut action = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(screen.title());
                if let Some(step) = screen.step() {
                    ui.label(RichText::new(format!("Step {step} of 4")).color(Color32::from_gray(170)));
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let text = if self.state.status.is_empty() { "Ready" } else { self.state.status.as_str() };
            ui.label(RichText::new(text).color(Color32::from_gray(170)));
        });

        if screen != Screen::Main {
            egui::TopBottomPanel::bottom("navigation").show(ctx, |ui| {
                ui.add_space(4.0);
                self.render_navigation(ui, screen, &mut action);
                ui.add_space(4.0);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match screen {
            Screen::Main => self.render_main(ui, &mut action),
            Screen::Settings => self.render_settings(ui, &mut action),
            Screen::Instructions => self.render_instructions(ui),
            Screen::LoadMetadata => self.render_load_metadata(ui, &mut action),
            Screen::LoadLexicon => self.render_load_lexicon(ui, &mut action),
            Screen::DataSelection => self.render_data_selection(ui),
            Screen::Results => self.render_results(ui, &mut action),
        });

        // ポップアップ表示中は他の操作を受け付けない
        if self.state.popup.is_some() {
            action = None;
        }
        self.render_popup(ctx);

        if let Some(action) = action {
            self.apply(action, ctx);
        }
    }
}

fn clip(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= CELL_CHARS {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(CELL_CHARS - 1).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short"), "short");
        assert_eq!(clip("two\nlines"), "two lines");

        let long = "x".repeat(CELL_CHARS + 10);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), CELL_CHARS);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_new_app_uses_results_dir() {
        let settings = Settings {
            default_results_dir: std::path::PathBuf::from("/tmp/results"),
            ..Settings::default()
        };
        let app = MarmatApp::new(settings);
        assert_eq!(app.session.screen(), Screen::Main);
        assert_eq!(
            app.state.output_path,
            std::path::PathBuf::from("/tmp/results/MaRMAT_output.csv")
        );
    }
}
