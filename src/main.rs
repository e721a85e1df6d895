//! Main module for the Stoper application using Yew.
//! Wires UI components, state hooks, and side-effect logic.
//!
//! The widget's scheduled work is exactly two cancellable handles: the
//! fixed-quantum tick `Interval` driving the clock while it runs, and the
//! single release `Timeout` armed after a stop while the single override's
//! phase is active. Both live in hook state, so replacing them cancels the
//! previous instance and unmounting drops (cancels) whatever is pending.

use gloo_timers::callback::{Interval, Timeout};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use stoper::storage;

mod components;
mod config;
mod store;
mod utils;

use components::{ClockFace, LapList, SettingsModal};
use config::{SINGLE_RELEASE_MS, TICK_MS};
use store::SESSION;
use utils::{parse_sets_text, sets_to_text};

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    // The session itself lives in the thread-local store; this handle only
    // asks Yew to re-render after a mutation (including every tick).
    let redraw = use_force_update();

    // Scheduled work, cancel-by-replace (at most one of each pending).
    let ticker = use_state(|| None::<Interval>);
    let release_timer = use_state(|| None::<Timeout>);

    let show_modal = use_state(|| false);
    let sets_text = use_state(String::new);
    let single_text = use_state(String::new);
    let dark = use_state(|| storage::load_flag(storage::KEY_UI_DARK, false));
    let laps_desc = use_state(|| storage::load_flag(storage::KEY_UI_LAPS_DESC, false));

    let (elapsed, running, laps, enabled, cursor, sequence_len) = SESSION.with(|s| {
        let session = s.borrow();
        (
            session.stopwatch.elapsed_ms(),
            session.stopwatch.running(),
            session.laps.records().to_vec(),
            session.overrides.enabled(),
            session.overrides.cursor(),
            session.overrides.flattened_len(),
        )
    });

    // Start/stop. Stopping resolves the clock's own time (the face shows the
    // recorded value) and, while the single override phase is active, arms
    // the release timer afterwards.
    let on_toggle = {
        let ticker = ticker.clone();
        let release_timer = release_timer.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let was_running = SESSION.with(|s| s.borrow().stopwatch.running());
            if was_running {
                ticker.set(None);
                let arm = SESSION.with(|s| {
                    let mut session = s.borrow_mut();
                    let elapsed = session.stopwatch.elapsed_ms();
                    let resolved = session.overrides.resolve(elapsed);
                    session.stopwatch.force_elapsed(resolved);
                    session.stopwatch.stop();
                    session.overrides.single_phase_active()
                });
                if arm {
                    let redraw = redraw.clone();
                    release_timer.set(Some(Timeout::new(SINGLE_RELEASE_MS, move || {
                        SESSION.with(|s| s.borrow_mut().overrides.deactivate_single());
                        redraw.force_update();
                    })));
                }
            } else {
                SESSION.with(|s| s.borrow_mut().stopwatch.start());
                let redraw = redraw.clone();
                ticker.set(Some(Interval::new(TICK_MS, move || {
                    SESSION.with(|s| s.borrow_mut().stopwatch.tick(TICK_MS));
                    redraw.force_update();
                })));
            }
            redraw.force_update();
        })
    };

    // Lap: resolve into the ledger only, the running clock is untouched and
    // no release timer is armed.
    let on_lap = {
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let recorded = SESSION.with(|s| {
                let mut session = s.borrow_mut();
                if !session.stopwatch.running() {
                    return false;
                }
                let elapsed = session.stopwatch.elapsed_ms();
                let resolved = session.overrides.resolve(elapsed);
                session.laps.append(resolved);
                true
            });
            if recorded {
                redraw.force_update();
            }
        })
    };

    // Reset zeroes the clock and empties the ledger; the override cursor
    // keeps its position. A pending release timer is cancelled so nothing
    // stays scheduled past the event that made it relevant.
    let on_reset = {
        let ticker = ticker.clone();
        let release_timer = release_timer.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            ticker.set(None);
            release_timer.set(None);
            SESSION.with(|s| {
                let mut session = s.borrow_mut();
                session.stopwatch.reset();
                session.laps.clear();
            });
            redraw.force_update();
        })
    };

    // Opening the modal re-reads the editor text from the store so it always
    // shows the canonical normalized form.
    let on_open_modal = {
        let show_modal = show_modal.clone();
        let sets_text = sets_text.clone();
        let single_text = single_text.clone();
        Callback::from(move |_: MouseEvent| {
            SESSION.with(|s| {
                let session = s.borrow();
                sets_text.set(sets_to_text(session.overrides.sets()));
                single_text.set(
                    session
                        .overrides
                        .single_target()
                        .unwrap_or_default()
                        .to_string(),
                );
            });
            show_modal.set(true);
        })
    };
    let on_close_modal = {
        let show_modal = show_modal.clone();
        Callback::from(move |_: ()| show_modal.set(false))
    };

    // --- editor text states ---
    let on_sets_input = {
        let sets_text = sets_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            sets_text.set(input.value());
        })
    };
    let on_single_input = {
        let single_text = single_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            single_text.set(input.value());
        })
    };

    // Commit the set editor: parse, normalize through the store, echo the
    // canonical text back into the editor.
    let on_sets_commit = {
        let sets_text = sets_text.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            let parsed = parse_sets_text(&sets_text);
            let canonical = SESSION.with(|s| {
                let mut session = s.borrow_mut();
                session.overrides.set_sets(parsed);
                sets_to_text(session.overrides.sets())
            });
            sets_text.set(canonical);
            redraw.force_update();
        })
    };

    // Commit the single override: blank clears. Any edit cancels a pending
    // release timer before it can fire with stale state.
    let on_single_commit = {
        let single_text = single_text.clone();
        let release_timer = release_timer.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            release_timer.set(None);
            let trimmed = single_text.trim().to_string();
            let canonical = SESSION.with(|s| {
                let mut session = s.borrow_mut();
                if trimmed.is_empty() {
                    session.overrides.set_single_target(None);
                } else {
                    session.overrides.set_single_target(Some(&trimmed));
                }
                session
                    .overrides
                    .single_target()
                    .unwrap_or_default()
                    .to_string()
            });
            single_text.set(canonical);
            redraw.force_update();
        })
    };

    let on_mode_toggle = {
        let redraw = redraw.clone();
        Callback::from(move |checked: bool| {
            SESSION.with(|s| s.borrow_mut().overrides.set_enabled(checked));
            redraw.force_update();
        })
    };
    let on_dark_toggle = {
        let dark = dark.clone();
        Callback::from(move |checked: bool| {
            storage::save_flag(storage::KEY_UI_DARK, checked);
            dark.set(checked);
        })
    };
    let on_laps_order_toggle = {
        let laps_desc = laps_desc.clone();
        Callback::from(move |checked: bool| {
            storage::save_flag(storage::KEY_UI_LAPS_DESC, checked);
            laps_desc.set(checked);
        })
    };

    let on_clear_all = {
        let sets_text = sets_text.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            SESSION.with(|s| s.borrow_mut().overrides.set_sets(Vec::new()));
            sets_text.set(String::new());
            redraw.force_update();
        })
    };

    let root_class = if *dark { "app dark" } else { "app" };
    let show_controls = running || elapsed > 0;

    html! {
        <div class={root_class}>
            <header class="app-header">
                <h1 class="app-title">{ config::APP_TITLE }</h1>
                <div class="menu-icon" onclick={on_open_modal}>
                    <span></span>
                    <span></span>
                    <span></span>
                </div>
            </header>

            <div class="stopwatch-container">
                <ClockFace ms={elapsed} />

                <button class="start-stop-btn" onclick={on_toggle}>
                    { if running { config::LABEL_STOP } else { config::LABEL_START } }
                </button>

                if show_controls {
                    <div class="control-buttons">
                        <button class="control-btn reset-btn" onclick={on_reset}>
                            { config::LABEL_RESET }
                        </button>
                        <button class="control-btn lap-btn" onclick={on_lap} disabled={!running}>
                            { config::LABEL_LAP }
                        </button>
                    </div>
                }

                <LapList laps={laps} newest_first={*laps_desc} />
            </div>

            if *show_modal {
                <SettingsModal
                    sets_text={(*sets_text).clone()}
                    single_text={(*single_text).clone()}
                    {enabled}
                    dark={*dark}
                    laps_desc={*laps_desc}
                    {cursor}
                    {sequence_len}
                    {on_sets_input}
                    {on_sets_commit}
                    {on_single_input}
                    {on_single_commit}
                    {on_mode_toggle}
                    {on_dark_toggle}
                    {on_laps_order_toggle}
                    {on_clear_all}
                    on_close={on_close_modal}
                />
            }
        </div>
    }
}

/// Entry point: install the panic hook and mount the widget.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
