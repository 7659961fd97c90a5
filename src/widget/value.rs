//! Value bindings: typed, non-owning views over caller storage.
//!
//! A widget never owns the value it edits. The caller keeps a [`Slot`] (a
//! shared `Cell`) and hands a clone to the widget through a [`Binding`]. Every
//! read goes through `f64`, every write converts back to the storage width:
//! integers round half up and saturate, floats flush tiny magnitudes to zero.
//!
//! Derived colour channels ([`Channel::H`], `S`, `V`) convert the bound RGB
//! triple to HSV on read, and back to RGB on write.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Caller-owned storage slot.
pub type Slot<T> = Rc<Cell<T>>;

/// Caller-owned text storage.
pub type TextSlot = Rc<RefCell<String>>;

/// Create a slot holding `value`.
pub fn slot<T>(value: T) -> Slot<T> {
    Rc::new(Cell::new(value))
}

/// Create a text slot holding `value`.
pub fn text_slot(value: impl Into<String>) -> TextSlot {
    Rc::new(RefCell::new(value.into()))
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// One channel of an RGB triple, either stored (R, G, B) or derived (H, S, V).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    H,
    S,
    V,
}

impl Channel {
    pub const ALL: [Channel; 6] = [Channel::R, Channel::G, Channel::B, Channel::H, Channel::S, Channel::V];

    /// Single-letter name.
    pub fn letter(self) -> &'static str {
        match self {
            Channel::R => "R",
            Channel::G => "G",
            Channel::B => "B",
            Channel::H => "H",
            Channel::S => "S",
            Channel::V => "V",
        }
    }

    fn is_derived(self) -> bool {
        matches!(self, Channel::H | Channel::S | Channel::V)
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// What a widget reads and writes.
#[derive(Debug, Clone, Default)]
pub enum Binding {
    /// Display-only widgets and plain buttons.
    #[default]
    None,
    Int8(Slot<i8>),
    Int16(Slot<i16>),
    Int32(Slot<i32>),
    Float32(Slot<f32>),
    /// A whole RGB colour (colour swatches).
    Rgb(Slot<[f32; 3]>),
    /// One channel of an RGB colour.
    Channel(Slot<[f32; 3]>, Channel),
    Text(TextSlot),
}

impl Binding {
    pub fn is_none(&self) -> bool {
        matches!(self, Binding::None)
    }

    /// Integer storage of any width.
    pub fn is_integer(&self) -> bool {
        matches!(self, Binding::Int8(_) | Binding::Int16(_) | Binding::Int32(_))
    }

    /// Storage that reads as a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Binding::Int8(_) | Binding::Int16(_) | Binding::Int32(_) | Binding::Float32(_) | Binding::Channel(..)
        )
    }

    /// Whether both bindings view the same storage.
    ///
    /// Channels of one RGB triple share storage with each other and with an
    /// `Rgb` binding of that triple. This is how radio rows and colour pickers
    /// find their siblings.
    pub fn same_storage(&self, other: &Binding) -> bool {
        match (self, other) {
            (Binding::Int8(a), Binding::Int8(b)) => Rc::ptr_eq(a, b),
            (Binding::Int16(a), Binding::Int16(b)) => Rc::ptr_eq(a, b),
            (Binding::Int32(a), Binding::Int32(b)) => Rc::ptr_eq(a, b),
            (Binding::Float32(a), Binding::Float32(b)) => Rc::ptr_eq(a, b),
            (Binding::Text(a), Binding::Text(b)) => Rc::ptr_eq(a, b),
            (Binding::Rgb(a) | Binding::Channel(a, _), Binding::Rgb(b) | Binding::Channel(b, _)) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }

    /// Read the bound value as a double. Text parses leniently (0 on failure),
    /// unbound and whole-colour bindings read as 0.
    pub fn get(&self) -> f64 {
        match self {
            Binding::None | Binding::Rgb(_) => 0.0,
            Binding::Int8(s) => s.get() as f64,
            Binding::Int16(s) => s.get() as f64,
            Binding::Int32(s) => s.get() as f64,
            Binding::Float32(s) => s.get() as f64,
            Binding::Channel(s, ch) => {
                let rgb = s.get();
                let v = match ch {
                    Channel::R => rgb[0],
                    Channel::G => rgb[1],
                    Channel::B => rgb[2],
                    Channel::H => rgb_to_hsv(rgb)[0],
                    Channel::S => rgb_to_hsv(rgb)[1],
                    Channel::V => rgb_to_hsv(rgb)[2],
                };
                v as f64
            }
            Binding::Text(t) => t.borrow().trim().parse().unwrap_or(0.0),
        }
    }

    /// Write a double through the binding. No clamping happens here.
    pub fn set(&self, value: f64) {
        match self {
            Binding::None | Binding::Rgb(_) => {}
            Binding::Int8(s) => s.set(round_half_up(value) as i8),
            Binding::Int16(s) => s.set(round_half_up(value) as i16),
            Binding::Int32(s) => s.set(round_half_up(value) as i32),
            Binding::Float32(s) => s.set(flush_tiny(value) as f32),
            Binding::Channel(s, ch) => {
                let v = flush_tiny(value) as f32;
                let mut rgb = s.get();
                if ch.is_derived() {
                    let mut hsv = rgb_to_hsv(rgb);
                    match ch {
                        Channel::H => hsv[0] = v,
                        Channel::S => hsv[1] = v,
                        _ => hsv[2] = v,
                    }
                    rgb = hsv_to_rgb(hsv);
                } else {
                    let i = match ch {
                        Channel::R => 0,
                        Channel::G => 1,
                        _ => 2,
                    };
                    rgb[i] = v;
                }
                s.set(rgb);
            }
            Binding::Text(t) => *t.borrow_mut() = format_number(value, 3),
        }
    }

    /// Current text of a text binding.
    pub fn text(&self) -> Option<String> {
        match self {
            Binding::Text(t) => Some(t.borrow().clone()),
            _ => None,
        }
    }

    /// Replace the text of a text binding. Other bindings ignore the call.
    pub fn set_text(&self, value: &str) {
        if let Binding::Text(t) = self {
            *t.borrow_mut() = value.to_owned();
        }
    }

    /// Raw bits of integer storage, at the storage width.
    ///
    /// Bit toggles work on this view so that the sign bit of narrow storage
    /// flips like any other bit. Floats read their truncated value.
    pub fn bits(&self) -> u32 {
        match self {
            Binding::Int8(s) => s.get() as u8 as u32,
            Binding::Int16(s) => s.get() as u16 as u32,
            Binding::Int32(s) => s.get() as u32,
            Binding::Float32(s) => s.get() as u32,
            _ => 0,
        }
    }

    /// Write raw bits, truncated to the storage width.
    pub fn set_bits(&self, bits: u32) {
        match self {
            Binding::Int8(s) => s.set(bits as u8 as i8),
            Binding::Int16(s) => s.set(bits as u16 as i16),
            Binding::Int32(s) => s.set(bits as i32),
            Binding::Float32(s) => s.set(bits as f32),
            _ => {}
        }
    }

    /// The bound RGB triple, for colour bindings.
    pub fn rgb(&self) -> Option<Slot<[f32; 3]>> {
        match self {
            Binding::Rgb(s) | Binding::Channel(s, _) => Some(s.clone()),
            _ => None,
        }
    }
}

impl From<Slot<i8>> for Binding {
    fn from(s: Slot<i8>) -> Self {
        Binding::Int8(s)
    }
}

impl From<Slot<i16>> for Binding {
    fn from(s: Slot<i16>) -> Self {
        Binding::Int16(s)
    }
}

impl From<Slot<i32>> for Binding {
    fn from(s: Slot<i32>) -> Self {
        Binding::Int32(s)
    }
}

impl From<Slot<f32>> for Binding {
    fn from(s: Slot<f32>) -> Self {
        Binding::Float32(s)
    }
}

impl From<Slot<[f32; 3]>> for Binding {
    fn from(s: Slot<[f32; 3]>) -> Self {
        Binding::Rgb(s)
    }
}

impl From<TextSlot> for Binding {
    fn from(s: TextSlot) -> Self {
        Binding::Text(s)
    }
}

/// Integer rounding: `floor(v + 0.5)`.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn flush_tiny(v: f64) -> f64 {
    if v.abs() < 1e-5 {
        0.0
    } else {
        v
    }
}

/// Format a number with `precision` decimals, trimming nothing.
pub fn format_number(v: f64, precision: u8) -> String {
    format!("{:.*}", precision as usize, v)
}

// ---------------------------------------------------------------------------
// Colour conversion
// ---------------------------------------------------------------------------

/// RGB (0..1) to HSV, hue in 0..1.
pub fn rgb_to_hsv([r, g, b]: [f32; 3]) -> [f32; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    if s == 0.0 {
        return [0.0, 0.0, v];
    }
    let mut h = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    h /= 6.0;
    if h < 0.0 {
        h += 1.0;
    }
    [h, s, v]
}

/// HSV (hue in 0..1) to RGB.
pub fn hsv_to_rgb([h, s, v]: [f32; 3]) -> [f32; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let h6 = if h >= 1.0 { 0.0 } else { h * 6.0 };
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i as i32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

// ===========================================================================
// Tests
// ===========================================================================
