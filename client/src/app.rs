use cantonal_shared::draw::random_start;
use cantonal_shared::{CanonicalRegion, Game, Geometry, Label, RegionCode, Shape};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::map_loader::{self, MapStatus};
use crate::storage::LocalStore;

pub(crate) type GameSignal = RwSignal<Game<LocalStore>>;

const RESET_PROMPT: &str = "Reset numbers for D/Ä/G, clear the log, and clear the map?";

fn apply_body_theme(dark: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    if body.class_list().toggle_with_force("dark", dark).is_err() {
        web_sys::console::warn_1(&"failed to toggle dark theme class".into());
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn region_element_id(code: &RegionCode) -> String {
    format!("canton-{code}")
}

/// Center of the rendered region, read back from the DOM once it is laid out.
fn region_center(code: &RegionCode) -> Option<(f32, f32)> {
    let element = web_sys::window()?
        .document()?
        .get_element_by_id(&region_element_id(code))?
        .dyn_into::<web_sys::SvgGraphicsElement>()
        .ok()?;
    let bbox = element.get_b_box().ok()?;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return None;
    }
    Some((
        bbox.x() + bbox.width() / 2.0,
        bbox.y() + bbox.height() / 2.0,
    ))
}

#[component]
pub fn App() -> impl IntoView {
    let game: GameSignal = RwSignal::new(Game::load(LocalStore));
    let map_status = RwSignal::new(MapStatus::Loading);
    provide_context(game);
    provide_context(map_status);

    Effect::new(move || apply_body_theme(game.with(|g| g.dark())));

    // Map loading is independent of the draw state and runs once per page load.
    Effect::new(move || map_loader::load_map(map_status));

    view! {
        <main class="page">
            <header class="page-header">
                <h1>"Numbers"</h1>
                <ThemeToggle />
            </header>
            <DrawPanel />
            <LogTable />
            <ResetButton />
            <MapPanel />
        </main>
    }
}

#[component]
fn ThemeToggle() -> impl IntoView {
    let game: GameSignal = expect_context();

    view! {
        <label class="theme-toggle">
            <input
                type="checkbox"
                prop:checked=move || game.with(|g| g.dark())
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    game.update(|g| g.set_dark(checked));
                }
            />
            " Dark mode"
        </label>
    }
}

#[component]
fn DrawPanel() -> impl IntoView {
    let game: GameSignal = expect_context();

    let buttons = Label::ALL
        .into_iter()
        .map(|label| {
            view! {
                <button
                    class="draw-button"
                    disabled=move || game.with(|g| g.is_exhausted(label))
                    on:click=move |_| {
                        let start = random_start(js_sys::Math::random());
                        let time = chrono::Local::now().time();
                        game.update(|g| {
                            g.draw(label, start, time);
                        });
                    }
                >
                    {label.as_str()}
                </button>
            }
        })
        .collect_view();

    view! {
        <section class="draw-panel">
            <div class="draw-buttons">{buttons}</div>
            <p class="draw-status">{move || game.with(|g| g.status_text())}</p>
        </section>
    }
}

#[component]
fn LogTable() -> impl IntoView {
    let game: GameSignal = expect_context();

    view! {
        <table class="draw-log">
            <thead>
                <tr>
                    <th>"Time"</th>
                    <th>"Player"</th>
                    <th>"Number"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || {
                        game.with(|g| {
                            g.state()
                                .log
                                .entries()
                                .iter()
                                .cloned()
                                .enumerate()
                                .rev()
                                .collect::<Vec<_>>()
                        })
                    }
                    key=|(index, _)| *index
                    children=|(_, entry)| {
                        view! {
                            <tr>
                                <td>{entry.time_text()}</td>
                                <td>{entry.label.as_str()}</td>
                                <td>{entry.value_text()}</td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
fn ResetButton() -> impl IntoView {
    let game: GameSignal = expect_context();

    view! {
        <button
            class="reset-button"
            on:click=move |_| {
                if confirm(RESET_PROMPT) {
                    game.update(|g| g.reset());
                }
            }
        >
            "Reset"
        </button>
    }
}

#[component]
fn MapPanel() -> impl IntoView {
    let game: GameSignal = expect_context();

    let chips = Label::ALL
        .into_iter()
        .map(|label| {
            view! {
                <button
                    class="chip"
                    class:active=move || game.with(|g| g.active_label() == label)
                    style:background-color=label.color_hex()
                    on:click=move |_| game.update(|g| g.set_active_label(label))
                >
                    {label.as_str()}
                </button>
            }
        })
        .collect_view();

    view! {
        <section class="map-panel">
            <div class="chips">{chips}</div>
            <CantonMap />
            <p class="map-counts">{move || game.with(|g| g.counts_text())}</p>
        </section>
    }
}

#[component]
fn CantonMap() -> impl IntoView {
    let map_status: RwSignal<MapStatus> = expect_context();

    move || match map_status.get() {
        MapStatus::Ready(map) => {
            let view_box = map.view_box.as_ref().map(|vb| vb.to_attr());
            let regions = map
                .regions
                .iter()
                .cloned()
                .map(|region| view! { <CantonRegion region=region /> })
                .collect_view();
            view! {
                <svg class="canton-map" viewBox=view_box preserveAspectRatio="xMidYMid meet">
                    {regions}
                </svg>
            }
            .into_any()
        }
        status => view! { <p class="map-status">{status.message()}</p> }.into_any(),
    }
}

#[component]
fn CantonRegion(region: CanonicalRegion) -> impl IntoView {
    let game: GameSignal = expect_context();
    let code = region.code;

    let paint = {
        let code = code.clone();
        Memo::new(move |_| game.with(|g| g.region_paint(&code)))
    };
    let center = RwSignal::new(None::<(f32, f32)>);
    {
        let code = code.clone();
        Effect::new(move || center.set(region_center(&code)));
    }
    let on_click = {
        let code = code.clone();
        move |_| {
            game.update(|g| {
                g.toggle_region(&code);
            })
        }
    };

    let shapes = region.shapes.into_iter().map(shape_view).collect_view();
    let text = code.to_string();

    view! {
        <g
            id=region_element_id(&code)
            class="canton"
            fill=move || paint.get().fill
            stroke=move || paint.get().stroke
            on:click=on_click
        >
            {shapes}
            {move || {
                center
                    .get()
                    .map(|(x, y)| {
                        view! {
                            <text
                                class="canton-label"
                                x=x.to_string()
                                y=y.to_string()
                                text-anchor="middle"
                                dominant-baseline="central"
                                stroke="none"
                                fill=move || paint.get().label
                            >
                                {text.clone()}
                            </text>
                        }
                    })
            }}
        </g>
    }
}

fn shape_view(shape: Shape) -> AnyView {
    let transform = shape.transform;
    match shape.geometry {
        Geometry::Path { d } => view! { <path d=d transform=transform /> }.into_any(),
        Geometry::Polygon { points } => {
            view! { <polygon points=points transform=transform /> }.into_any()
        }
        Geometry::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        } => view! {
            <rect x=x y=y width=width height=height rx=rx ry=ry transform=transform />
        }
        .into_any(),
    }
}
