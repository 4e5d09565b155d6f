use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2, vec2};

use crate::graph::{KnowledgeGraph, load_document};

mod graph;
mod physics;
mod render_utils;
mod ui;

/// Fixed-size world canvas the layout runs in. Pinned coordinates are always
/// clamped to these bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub(in crate::app) fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub(in crate::app) fn clamp(self, point: Vec2) -> Vec2 {
        vec2(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}

pub struct KnowledgeGraphApp {
    graph_path: PathBuf,
    canvas: Canvas,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

type LoadResult = Result<KnowledgeGraph, String>;

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    document: KnowledgeGraph,
    canvas: Canvas,
    layout: LayoutGraph,
    layout_revision: u64,
    dropped_links: usize,
    selected: Option<usize>,
    dragging: Option<usize>,
    commands: VecDeque<PointerCommand>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    pan: Vec2,
    zoom: f32,
    sim: SimConfig,
    show_labels: bool,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct SearchMatchCache {
    query: String,
    layout_revision: u64,
    matches: Arc<HashSet<usize>>,
}

/// Private working copy of the loaded document: nodes and links in flat
/// arrays, links referencing nodes by index. The document itself is never
/// mutated, so rebuilding always yields the same starting state.
struct LayoutGraph {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    index_by_id: HashMap<String, usize>,
    /// Undirected adjacency: for each node, (neighbor index, distance).
    adjacency: Vec<Vec<(usize, f32)>>,
    alpha: f32,
    scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

struct SimNode {
    id: String,
    title: String,
    published_date: String,
    position: Vec2,
    velocity: Vec2,
    pin: Pin,
}

/// A node is either governed by simulation forces or held exactly at a
/// user-chosen point. There is no half-set state.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Pin {
    Free,
    Pinned(Vec2),
}

impl Pin {
    fn is_pinned(self) -> bool {
        matches!(self, Pin::Pinned(_))
    }
}

struct SimLink {
    source: usize,
    target: usize,
    value: f32,
}

/// Pointer interactions are queued and drained once per frame, before the
/// force pass, so the simulation step and the handlers never interleave.
#[derive(Clone, Copy, Debug, PartialEq)]
enum PointerCommand {
    Drag { index: usize, point: Vec2 },
    Click { index: usize },
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    degrees: Vec<usize>,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    visible_indices: Vec<usize>,
}

#[derive(Clone, Copy)]
struct SimConfig {
    repulsion: f32,
    link_distance: f32,
    center_pull: f32,
    velocity_decay: f32,
    alpha_decay: f32,
    alpha_min: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            repulsion: 18_000.0,
            link_distance: 70.0,
            center_pull: 0.012,
            velocity_decay: 0.6,
            // Decays alpha from 1.0 to ~0.001 over roughly 300 steps.
            alpha_decay: 0.0228,
            alpha_min: 0.001,
        }
    }
}

impl KnowledgeGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph_path: PathBuf, canvas: Canvas) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            canvas,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_document(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for KnowledgeGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(document) => {
                            AppState::Ready(Box::new(ViewModel::new(document, self.canvas)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge graph document");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(document) => {
                                    AppState::Ready(Box::new(ViewModel::new(document, self.canvas)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
