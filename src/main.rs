use std::sync::{Arc, Mutex, PoisonError};
use std::thread::spawn;

use anyhow::Result;
use eframe::{App, AppCreator, CreationContext, egui};

use crate::catalog::{
    active_chips, active_filter_count, load_items, CatalogItem, FacetCatalog, FilterCommand,
    FilterController, FilterEngine, FilterState, DIFFICULTY, EQUIPMENT, MUSCLE,
};
use crate::egui::{Color32, Context, RichText, Spinner, Ui, Visuals};
use crate::settings::Settings;

mod catalog;
mod settings;

#[derive(Clone)]
enum ExerciseState {
    Loading,
    Loaded(LoadedState),
    Failed(String),
}

#[derive(Clone)]
struct LoadedState {
    controller: Arc<FilterController>,

    /// The catalog with option counts computed from the loaded items.
    catalog: Arc<FacetCatalog>,

    /// The last pair published by the controller.
    published: Arc<Mutex<Published>>,
}

#[derive(Clone)]
struct Published {
    state: FilterState,
    items: Vec<CatalogItem>,
}

impl Published {
    fn new(state: &FilterState, items: &[&CatalogItem]) -> Self {
        Self {
            state: state.clone(),
            items: items.iter().copied().cloned().collect(),
        }
    }
}

/// View-only state, never part of the filter state.
#[derive(Default)]
struct ViewState {
    query: String,
    open_section: Option<String>,
}

struct ExerciseApp {
    state: Arc<Mutex<ExerciseState>>,
    view: ViewState,
}

impl ExerciseApp {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ExerciseState::Loading.into()),
            view: ViewState::default(),
        }
    }

    fn handle_events(&mut self, ctx: &Context) {
        if ctx.input(|input| input.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn paint(&mut self, ctx: &Context) -> Vec<FilterCommand> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let mut commands = Vec::new();

        match state {
            ExerciseState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.add(Spinner::new().size(32.0));
                    });
                });
            }

            ExerciseState::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new(message).color(Color32::LIGHT_RED));
                    });
                });
            }

            ExerciseState::Loaded(loaded) => {
                let published = loaded.published.lock().unwrap_or_else(PoisonError::into_inner).clone();

                egui::SidePanel::left("filters")
                    .resizable(false)
                    .default_width(260.0)
                    .show(ctx, |ui| {
                        paint_filters(ui, &loaded.catalog, &published.state, &mut self.view, &mut commands);
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    paint_results(ui, &published.items, &mut commands);
                });
            }
        }

        commands
    }
}

fn paint_filters(
    ui: &mut Ui,
    catalog: &FacetCatalog,
    state: &FilterState,
    view: &mut ViewState,
    commands: &mut Vec<FilterCommand>,
) {
    let search = egui::TextEdit::singleline(&mut view.query).hint_text("Search exercises...");
    if ui.add(search).changed() {
        commands.push(FilterCommand::SetQuery(view.query.clone()));
    }

    let active = active_filter_count(state);
    if active > 0 {
        ui.horizontal(|ui| {
            ui.label(format!("{active} active filters"));
            if ui.button("Clear all").clicked() {
                commands.push(FilterCommand::ClearAll);
            }
        });

        ui.horizontal_wrapped(|ui| {
            for chip in active_chips(state, catalog) {
                let button = ui
                    .button(format!("{} x", chip.label))
                    .on_hover_text(format!("Remove {} filter", chip.label));

                if button.clicked() {
                    commands.push(FilterCommand::Toggle {
                        facet_id: chip.facet_id.to_owned(),
                        value: chip.value.to_owned(),
                    });
                }
            }
        });
    }

    ui.separator();

    for facet in catalog.facets() {
        let open = view.open_section.as_deref() == Some(facet.id.as_str());

        if ui.selectable_label(open, RichText::new(&facet.name).strong()).clicked() {
            view.open_section = if open { None } else { Some(facet.id.clone()) };
        }

        if !open {
            continue;
        }

        ui.indent(&facet.id, |ui| {
            for option in &facet.options {
                let selected = state.is_selected(&facet.id, &option.value);
                let text = match option.count {
                    Some(count) => format!("{} ({count})", option.label),
                    None => option.label.clone(),
                };

                if ui.selectable_label(selected, text).clicked() {
                    commands.push(FilterCommand::Toggle {
                        facet_id: facet.id.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        });
    }
}

fn paint_results(ui: &mut Ui, items: &[CatalogItem], commands: &mut Vec<FilterCommand>) {
    ui.heading(format!("{} Exercises", items.len()));
    ui.label(RichText::new("Find the perfect exercise for your workout routine").color(Color32::GRAY));
    ui.separator();

    if items.is_empty() {
        ui.vertical_centered(|ui| {
            ui.heading("No exercises found");
            ui.label("Try adjusting your filters to find more exercises");
            if ui.button("Clear Filters").clicked() {
                commands.push(FilterCommand::Reset);
            }
        });

        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for item in items {
                paint_card(ui, item);
            }
        });
    });
}

fn paint_card(ui: &mut Ui, item: &CatalogItem) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(220.0);

        ui.vertical(|ui| {
            let difficulty = item.attribute(DIFFICULTY).unwrap_or_default();
            ui.label(RichText::new(difficulty).small().color(difficulty_color(difficulty)));
            ui.label(RichText::new(&item.name).strong().size(16.0));

            ui.horizontal(|ui| {
                for value in [MUSCLE, EQUIPMENT].into_iter().filter_map(|id| item.attribute(id)) {
                    ui.label(RichText::new(value).small());
                }

                ui.label(RichText::new(format!("{} min", item.duration_minutes)).small());
            });
        });
    });
}

fn difficulty_color(difficulty: &str) -> Color32 {
    match difficulty {
        "beginner" => Color32::LIGHT_GREEN,
        "intermediate" => Color32::LIGHT_BLUE,
        "advanced" => Color32::LIGHT_RED,
        _ => Color32::GRAY,
    }
}

impl App for ExerciseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_events(ctx);
        let commands = self.paint(ctx);

        if commands.is_empty() {
            return;
        }

        if commands.contains(&FilterCommand::Reset) {
            self.view.query.clear();
        }

        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let ExerciseState::Loaded(loaded) = state {
            for command in commands {
                loaded.controller.dispatch(command);
            }
        }
    }
}

fn create_app(cc: &CreationContext<'_>, app: ExerciseApp, settings: Settings) -> Box<dyn App> {
    cc.egui_ctx.set_visuals(Visuals::dark());

    let ctx = cc.egui_ctx.clone();
    let state_arc = Arc::clone(&app.state);

    spawn(move || {
        let loaded = load_state(&settings, ctx.clone());

        let mut state = state_arc.lock().unwrap_or_else(PoisonError::into_inner);

        *state = match loaded {
            Ok(loaded) => ExerciseState::Loaded(loaded),
            Err(err) => {
                log::error!("failed to load exercises: {err:#}");
                ExerciseState::Failed(format!("{err:#}"))
            }
        };

        drop(state);

        ctx.request_repaint();
    });

    Box::new(app)
}

fn load_state(settings: &Settings, ctx: Context) -> Result<LoadedState> {
    let items = load_items(&settings.item_sources())?;
    log::info!("loaded {} exercises", items.len());

    let engine = FilterEngine::new(settings.catalog(), settings.matcher());
    let catalog = Arc::new(engine.count_options(&items));
    let controller = Arc::new(FilterController::new(engine, items));

    let initial = Published::new(&controller.current_state(), &controller.filtered_items());
    let published = Arc::new(Mutex::new(initial));

    let sink = Arc::clone(&published);
    // registered for the lifetime of the window
    let _subscription = controller.subscribe(move |state, items| {
        *sink.lock().unwrap_or_else(PoisonError::into_inner) = Published::new(state, items);
        ctx.request_repaint();
    });

    Ok(LoadedState {
        controller,
        catalog,
        published,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("Exercise Library"),
        ..Default::default()
    };

    let app = ExerciseApp::new();
    let app_name = "fitcatalog";
    let app_creator: AppCreator = Box::new(move |cc| create_app(cc, app, settings));
    eframe::run_native(app_name, native_options, app_creator)
        .map_err(|err| anyhow::anyhow!(err.to_string()))
}
