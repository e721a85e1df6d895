//! Pure Yew view components for the Stoper UI.
//!
//! Stateless pieces that render from props: the clock face, the lap list and
//! the settings modal. All mutation flows back to the main component through
//! callbacks.

use web_sys::HtmlInputElement;
use yew::prelude::*;

use stoper::{format_clock, LapRecord};

use crate::config;

/// The large `MM:SS.CC` readout.
#[derive(Properties, PartialEq)]
pub struct ClockFaceProps {
    pub ms: u32,
}

#[function_component(ClockFace)]
pub fn clock_face(props: &ClockFaceProps) -> Html {
    html! {
        <div class="time-display">{ format_clock(props.ms) }</div>
    }
}

/// Recorded laps, rendered oldest-first or newest-first.
#[derive(Properties, PartialEq)]
pub struct LapListProps {
    pub laps: Vec<LapRecord>,
    pub newest_first: bool,
}

fn render_lap(record: &LapRecord) -> Html {
    html! {
        <div class="lap-item">
            <span class="lap-number">{ format!("#{}", record.number) }</span>
            <span class="lap-time">{ format_clock(record.recorded_ms) }</span>
        </div>
    }
}

#[function_component(LapList)]
pub fn lap_list(props: &LapListProps) -> Html {
    if props.laps.is_empty() {
        return html! {};
    }
    let rows: Html = if props.newest_first {
        props.laps.iter().rev().map(render_lap).collect()
    } else {
        props.laps.iter().map(render_lap).collect()
    };
    html! {
        <div class="laps-container">
            <div class="laps-title">{ config::LABEL_LAPS }</div>
            <div class="laps-list">{ rows }</div>
        </div>
    }
}

/// The "Rutyny" settings modal: override-set editor, single override input,
/// the mode switch and the presentation toggles.
#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
    pub sets_text: String,
    pub single_text: String,
    pub enabled: bool,
    pub dark: bool,
    pub laps_desc: bool,
    /// Consumption progress of the flattened sequence, for display only.
    pub cursor: usize,
    pub sequence_len: usize,
    pub on_sets_input: Callback<InputEvent>,
    pub on_sets_commit: Callback<()>,
    pub on_single_input: Callback<InputEvent>,
    pub on_single_commit: Callback<()>,
    pub on_mode_toggle: Callback<bool>,
    pub on_dark_toggle: Callback<bool>,
    pub on_laps_order_toggle: Callback<bool>,
    pub on_clear_all: Callback<()>,
    pub on_close: Callback<()>,
}

fn checkbox_callback(toggle: &Callback<bool>) -> Callback<Event> {
    let toggle = toggle.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        toggle.emit(input.checked());
    })
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let swallow_click = Callback::from(|e: MouseEvent| e.stop_propagation());
    let single_keydown = {
        let commit = props.on_single_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit.emit(());
            }
        })
    };
    let clear_all = {
        let on_clear_all = props.on_clear_all.clone();
        Callback::from(move |_: MouseEvent| on_clear_all.emit(()))
    };
    let show_cursor = props.sequence_len > 0;

    html! {
        <div class="modal-overlay" onclick={close.clone()}>
            <div class="modal-content" onclick={swallow_click}>
                <div class="modal-header">
                    <h2>{ config::MODAL_TITLE }</h2>
                    <button class="modal-close" onclick={close} aria-label="Zamknij">{ "×" }</button>
                </div>
                <div class="modal-body">
                    <div class="form-group">
                        <label for="override_sets_input">{ "Zestawy (jedna linia = jeden zestaw):" }</label>
                        <textarea
                            id="override_sets_input"
                            rows="6"
                            placeholder="07 12 99"
                            value={props.sets_text.clone()}
                            oninput={props.on_sets_input.clone()}
                            onchange={props.on_sets_commit.reform(|_| ())}
                        />
                        if show_cursor {
                            <div class="cursor-status">
                                { format!("Zużyto {}/{}", props.cursor, props.sequence_len) }
                            </div>
                        }
                    </div>

                    <div class="form-group">
                        <label for="single_override_input">{ "Pojedyncza liczba:" }</label>
                        <input
                            type="text"
                            id="single_override_input"
                            inputmode="numeric"
                            placeholder="00"
                            value={props.single_text.clone()}
                            oninput={props.on_single_input.clone()}
                            onchange={props.on_single_commit.reform(|_| ())}
                            onkeydown={single_keydown}
                        />
                    </div>

                    <div class="form-group checkbox-group">
                        <label>
                            <input type="checkbox"
                                checked={props.enabled}
                                onchange={checkbox_callback(&props.on_mode_toggle)}
                            />
                            { "Wymuszone wartości włączone" }
                        </label>
                        <label>
                            <input type="checkbox"
                                checked={props.dark}
                                onchange={checkbox_callback(&props.on_dark_toggle)}
                            />
                            { "Ciemne tło" }
                        </label>
                        <label>
                            <input type="checkbox"
                                checked={props.laps_desc}
                                onchange={checkbox_callback(&props.on_laps_order_toggle)}
                            />
                            { "Najnowsze okrążenia na górze" }
                        </label>
                    </div>

                    <button class="clear-all-btn" onclick={clear_all}>
                        { config::LABEL_CLEAR_ALL }
                    </button>
                </div>
            </div>
        </div>
    }
}
