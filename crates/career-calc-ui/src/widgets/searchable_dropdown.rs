//! Searchable Dropdown
//!
//! Typeahead combobox over a list of strings. [`DropdownState`] is the
//! headless state machine (open/closed, search text, highlighted row,
//! list scroll); [`searchable_dropdown`] renders it with egui and feeds it
//! input. The widget never owns the selected value: it returns the new
//! value when the user commits (or clears) one.

use egui::{Color32, Key, Order, RichText, ScrollArea, SelectableLabel, TextEdit, Ui};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Height of one option row.
pub const ROW_HEIGHT: f32 = 24.0;

/// Tallest the option list gets before it scrolls.
pub const LIST_MAX_HEIGHT: f32 = 240.0;

/// Case-insensitive substring filter. Keeps the original order and never
/// touches `options`.
pub fn filter_options<'a>(options: &'a [String], search: &str) -> Vec<&'a str> {
    let needle = search.to_lowercase();
    options
        .iter()
        .filter(|option| option.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

/// Scroll offset that brings the row spanning `item_top..item_top + item_height`
/// into a viewport of `viewport_height`, moving as little as possible.
pub fn scroll_into_view(
    item_top: f32,
    item_height: f32,
    scroll_offset: f32,
    viewport_height: f32,
) -> f32 {
    let item_bottom = item_top + item_height;
    if item_top < scroll_offset {
        item_top
    } else if item_bottom > scroll_offset + viewport_height {
        item_bottom - viewport_height
    } else {
        scroll_offset
    }
}

/// Keys the dropdown reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Tab { shift: bool },
    Enter,
    Escape,
}

/// Everything that can happen to the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownInput {
    Focus,
    TextChanged(String),
    Key(NavKey),
    /// Pointer moved onto a row of the filtered list.
    Hover(usize),
    /// Row of the filtered list clicked.
    Click(usize),
    /// Pointer pressed outside the input and the list.
    ClickOutside,
}

/// Result of one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownResponse {
    /// New value for the parent; `Some("")` clears the selection.
    pub changed: Option<String>,
    /// The key was used by the dropdown and must not do anything else
    /// (Tab must not move focus, arrows must not move the caret).
    pub consumed: bool,
}

#[derive(Debug, Clone)]
pub struct DropdownState {
    open: bool,
    search: String,
    highlighted: Option<usize>,
    /// (search, fingerprint of the filtered list) the highlight was last
    /// reset for.
    last_filter: Option<(String, u64)>,
    scroll_offset: f32,
    viewport_height: f32,
    scroll_pending: bool,
}

impl Default for DropdownState {
    fn default() -> Self {
        Self {
            open: false,
            search: String::new(),
            highlighted: None,
            last_filter: None,
            scroll_offset: 0.0,
            viewport_height: LIST_MAX_HEIGHT,
            scroll_pending: false,
        }
    }
}

impl DropdownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Text shown in the input: the live search, else the committed value.
    /// Disabled dropdowns show nothing so the placeholder is visible.
    pub fn display_text<'a>(&'a self, value: &'a str, disabled: bool) -> &'a str {
        if disabled {
            ""
        } else if !self.search.is_empty() {
            &self.search
        } else {
            value
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.last_filter = None;
    }

    /// Reset the highlight to the first match whenever the filtered set
    /// changed while open. Call once per frame before reading state, since
    /// `options` can change underneath (e.g. areas finishing loading).
    pub fn sync(&mut self, options: &[String]) {
        if !self.open {
            return;
        }
        let filtered = filter_options(options, &self.search);
        let count = filtered.len();
        let key = (self.search.clone(), fingerprint(&filtered));
        if self.last_filter.as_ref() != Some(&key) {
            self.highlighted = if count > 0 { Some(0) } else { None };
            self.last_filter = Some(key);
            self.scroll_offset = 0.0;
            self.scroll_pending = true;
        }
    }

    /// Feed one input through the state machine.
    pub fn handle(
        &mut self,
        input: DropdownInput,
        options: &[String],
        value: &str,
        disabled: bool,
    ) -> DropdownResponse {
        let mut response = DropdownResponse::default();
        if disabled {
            self.close();
            self.search.clear();
            return response;
        }

        match input {
            DropdownInput::Focus => {
                self.open = true;
                self.search.clear();
            }
            DropdownInput::TextChanged(text) => {
                self.open = true;
                if text.is_empty() && !value.is_empty() {
                    response.changed = Some(String::new());
                }
                self.search = text;
            }
            DropdownInput::Key(key) => self.handle_key(key, options, &mut response),
            DropdownInput::Hover(idx) => {
                if idx < filter_options(options, &self.search).len() {
                    self.highlighted = Some(idx);
                }
            }
            DropdownInput::Click(idx) => {
                let picked = filter_options(options, &self.search)
                    .get(idx)
                    .map(|option| option.to_string());
                if let Some(option) = picked {
                    self.commit(option, &mut response);
                }
            }
            DropdownInput::ClickOutside => self.close(),
        }

        self.sync(options);
        response
    }

    fn handle_key(&mut self, key: NavKey, options: &[String], response: &mut DropdownResponse) {
        let filtered_len = filter_options(options, &self.search).len();
        match key {
            NavKey::Down | NavKey::Up => {
                response.consumed = true;
                if !self.open {
                    // Opening highlights the first match.
                    self.open = true;
                    return;
                }
                self.sync(options);
                self.move_highlight(if key == NavKey::Down { 1 } else { -1 }, filtered_len);
            }
            NavKey::Tab { shift } => {
                if self.open && filtered_len > 0 {
                    response.consumed = true;
                    self.sync(options);
                    self.move_highlight(if shift { -1 } else { 1 }, filtered_len);
                } else {
                    // Focus moves on to the next field.
                    self.close();
                }
            }
            NavKey::Enter => {
                if !self.open {
                    return;
                }
                let picked = self.highlighted.and_then(|idx| {
                    filter_options(options, &self.search)
                        .get(idx)
                        .map(|option| option.to_string())
                });
                if let Some(option) = picked {
                    response.consumed = true;
                    self.commit(option, response);
                }
            }
            NavKey::Escape => {
                if self.open {
                    response.consumed = true;
                    self.close();
                }
            }
        }
    }

    fn move_highlight(&mut self, direction: isize, len: usize) {
        if len == 0 {
            return;
        }
        let len = len as isize;
        let next = match self.highlighted {
            None => 0,
            Some(idx) => (idx as isize + direction + len) % len,
        };
        self.highlighted = Some(next as usize);
        self.scroll_pending = true;
    }

    fn commit(&mut self, option: String, response: &mut DropdownResponse) {
        response.changed = Some(option);
        self.search.clear();
        self.highlighted = None;
        self.close();
    }

    /// If the highlight moved since the last call, the scroll offset that
    /// keeps it visible.
    pub fn take_scroll_request(&mut self) -> Option<f32> {
        if !self.scroll_pending {
            return None;
        }
        self.scroll_pending = false;
        let idx = self.highlighted?;
        let target = scroll_into_view(
            idx as f32 * ROW_HEIGHT,
            ROW_HEIGHT,
            self.scroll_offset,
            self.viewport_height,
        );
        self.scroll_offset = target;
        Some(target)
    }

    /// Record where the list actually ended up (the user may scroll it).
    pub fn record_scroll(&mut self, offset: f32, viewport_height: f32) {
        self.scroll_offset = offset;
        if viewport_height > 0.0 {
            self.viewport_height = viewport_height;
        }
    }
}

fn fingerprint(filtered: &[&str]) -> u64 {
    let mut hasher = DefaultHasher::new();
    filtered.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// RENDERING
// =============================================================================

/// Render a searchable dropdown. Returns the new value when the user
/// commits an option (or `Some("")` when they clear the input).
pub fn searchable_dropdown(
    ui: &mut Ui,
    id_salt: &str,
    state: &mut DropdownState,
    options: &[String],
    value: &str,
    placeholder: &str,
    disabled: bool,
) -> Option<String> {
    let id = ui.make_persistent_id(id_salt);
    let mut changed = None;
    let mut apply = |state: &mut DropdownState, input: DropdownInput| {
        let response = state.handle(input, options, value, disabled);
        if response.changed.is_some() {
            changed = response.changed;
        }
    };

    state.sync(options);

    let trap_tab = state.is_open() && !filter_options(options, state.search()).is_empty();
    let mut buffer = state.display_text(value, disabled).to_string();
    let input = ui.add_enabled(
        !disabled,
        TextEdit::singleline(&mut buffer)
            .id(id.with("input"))
            .hint_text(placeholder)
            .desired_width(f32::INFINITY)
            .lock_focus(trap_tab),
    );

    if disabled {
        apply(state, DropdownInput::ClickOutside);
        return None;
    }

    if input.gained_focus() {
        apply(state, DropdownInput::Focus);
    }
    if input.changed() {
        apply(state, DropdownInput::TextChanged(buffer));
    }

    if input.has_focus() || input.lost_focus() {
        let keys = ui.input(|i| {
            let mut keys = Vec::new();
            if i.key_pressed(Key::ArrowDown) {
                keys.push(NavKey::Down);
            }
            if i.key_pressed(Key::ArrowUp) {
                keys.push(NavKey::Up);
            }
            if i.key_pressed(Key::Tab) {
                keys.push(NavKey::Tab {
                    shift: i.modifiers.shift,
                });
            }
            if i.key_pressed(Key::Enter) {
                keys.push(NavKey::Enter);
            }
            if i.key_pressed(Key::Escape) {
                keys.push(NavKey::Escape);
            }
            keys
        });
        for key in keys {
            apply(state, DropdownInput::Key(key));
        }
    }

    if !state.is_open() {
        return changed;
    }

    // Option list, floating below the input
    let filtered: Vec<String> = filter_options(options, state.search())
        .into_iter()
        .map(str::to_string)
        .collect();
    let highlighted = state.highlighted();
    let scroll_to = state.take_scroll_request();
    let pointer_moved = ui.input(|i| i.pointer.delta() != egui::Vec2::ZERO);
    let width = input.rect.width();

    let mut hovered = None;
    let mut clicked = None;
    let popup = egui::Area::new(id.with("popup"))
        .order(Order::Foreground)
        .fixed_pos(input.rect.left_bottom() + egui::vec2(0.0, 4.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(width);
                if filtered.is_empty() {
                    ui.label(RichText::new("No results found").color(Color32::GRAY));
                    return;
                }

                let mut scroll = ScrollArea::vertical()
                    .id_salt(id.with("list"))
                    .max_height(LIST_MAX_HEIGHT);
                if let Some(offset) = scroll_to {
                    scroll = scroll.vertical_scroll_offset(offset);
                }

                let output = scroll.show(ui, |ui| {
                    ui.spacing_mut().item_spacing.y = 0.0;
                    for (idx, option) in filtered.iter().enumerate() {
                        let row = ui.add_sized(
                            [width, ROW_HEIGHT],
                            SelectableLabel::new(highlighted == Some(idx), option),
                        );
                        if row.hovered() && pointer_moved {
                            hovered = Some(idx);
                        }
                        if row.clicked() {
                            clicked = Some(idx);
                        }
                    }
                });
                state.record_scroll(output.state.offset.y, output.inner_rect.height());
            });
        });

    if let Some(idx) = hovered {
        apply(state, DropdownInput::Hover(idx));
    }
    if let Some(idx) = clicked {
        apply(state, DropdownInput::Click(idx));
    }

    let outside = ui.input(|i| {
        i.pointer.any_pressed()
            && i.pointer.interact_pos().is_some_and(|pos| {
                !input.rect.contains(pos) && !popup.response.rect.contains(pos)
            })
    });
    if outside {
        apply(state, DropdownInput::ClickOutside);
    }

    changed
}
