//! Builds popup blocks for menus and icon rows.

use crate::block::{Block, BlockFlags};
use crate::error::UiError;
use crate::geometry::{Region, Size};
use crate::widget::{Binding, Range, Widget};

use super::parse::{MenuEntry, MenuSpec};

/// Height of one menu row.
pub const ROW_HEIGHT: i32 = 20;

const MIN_ITEM_WIDTH: i32 = 60;

/// Columns and rows for `n` entries: 20 per column, 25 once that needs more
/// than 8 columns.
pub fn grid(n: usize) -> (usize, usize) {
    let mut columns = (n + 20) / 20;
    if columns > 8 {
        columns = (n + 25) / 25;
    }
    let columns = columns.max(1);
    (columns, n.div_ceil(columns))
}

/// Rect of entry `i` in column-major order below a header of `top` pixels.
fn cell(i: usize, rows: usize, size: Size, top: i32) -> Region {
    let rows = rows.max(1);
    let col = (i / rows) as i32;
    let row = (i % rows) as i32;
    Region::new(col * size.width, top + row * size.height, size.width, size.height)
}

fn popup_flags() -> BlockFlags {
    BlockFlags::LOOP | BlockFlags::NUMSELECT | BlockFlags::KEY_NAV | BlockFlags::MOVEMOUSE_QUIT
}

/// The popup of a menu widget. Items write their value into `binding`; the
/// item matching the current value starts active.
pub fn menu_block(spec: &MenuSpec, binding: &Binding, width: i32) -> Result<Block, UiError> {
    let size = Size::new(width.max(MIN_ITEM_WIDTH), ROW_HEIGHT);
    let (columns, rows) = grid(spec.len());
    let mut block = Block::new("menu").with_flags(popup_flags());

    let mut top = 0;
    if let Some(title) = &spec.title {
        let mut label = Widget::label(title.clone(), Region::new(0, 0, size.width * columns as i32, ROW_HEIGHT));
        if let Some(icon) = spec.title_icon {
            label = label.with_icon(icon);
        }
        block.add(label)?;
        top = ROW_HEIGHT;
    }

    let current = binding.get();
    let mut active = None;
    for (i, entry) in spec.entries.iter().enumerate() {
        let rect = cell(i, rows, size, top);
        let widget = match entry {
            MenuEntry::Separator => Widget::separator(rect),
            MenuEntry::Item { label, retval, icon } => {
                let mut item = Widget::menu_item(label.clone(), rect, binding.clone(), f64::from(*retval));
                if let Some(icon) = icon {
                    item = item.with_icon(*icon);
                }
                item
            }
        };
        let is_current = matches!(entry, MenuEntry::Item { retval, .. } if f64::from(*retval) == current);
        let idx = block.add(widget)?;
        if is_current {
            active = Some(idx);
        }
    }
    if let Some(idx) = active {
        block.set_active(Some(idx));
    }
    Ok(block)
}

/// The popup of an icon row: one icon item per integer in the range.
pub fn icon_block(binding: &Binding, base_icon: u32, range: Range, size: Size) -> Result<Block, UiError> {
    let size = Size::new(size.width.max(ROW_HEIGHT), size.height.max(ROW_HEIGHT));
    let min = range.min.round() as i64;
    let max = range.max.round() as i64;
    let n = (max - min + 1).max(0) as usize;
    let (_, rows) = grid(n);
    let mut block = Block::new("icons").with_flags(popup_flags());
    let current = binding.get();
    for (i, v) in (min..=max).enumerate() {
        let value = v as f64;
        let icon = base_icon + (v - min) as u32;
        let item = Widget::menu_item("", cell(i, rows, size, 0), binding.clone(), value).with_icon(icon);
        let idx = block.add(item)?;
        if value == current {
            block.set_active(Some(idx));
        }
    }
    Ok(block)
}

// ===========================================================================
// Tests
// ===========================================================================
