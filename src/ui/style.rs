pub fn root_container_style() -> &'static str {
    "font-family: 'Noto Sans', sans-serif; display: flex; height: 100vh; min-height: 100vh; background: #fff;"
}

pub fn sidebar_style() -> &'static str {
    "width: 260px; flex-shrink: 0; padding: 12px; border-right: 1px solid #ddd; overflow-y: auto; background: #fafafa;"
}

pub fn content_style() -> &'static str {
    "flex: 1; padding: 12px 16px; overflow: auto;"
}

pub fn table_container_style() -> &'static str {
    "max-height: 420px; overflow: auto; border: 1px solid #ddd;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 2; background: #f5f5f5; border: 1px solid #ddd; padding: 4px 8px; text-align: left;"
}

pub fn table_cell_style(numeric: bool) -> &'static str {
    if numeric {
        "border: 1px solid #eee; padding: 4px 8px; text-align: right;"
    } else {
        "border: 1px solid #eee; padding: 4px 8px; text-align: left;"
    }
}

pub fn bar_fill_style(fraction: f64, other: bool) -> String {
    let color = if other { "#b0b7c3" } else { "#4c78a8" };
    let width = (fraction * 100.0).clamp(0.0, 100.0);
    format!("height: 14px; width: {width:.1}%; background: {color}; border-radius: 3px;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticky_header_styles_include_positioning() {
        let style = table_header_cell_style();
        assert!(style.contains("position: sticky"));
        assert!(style.contains("top: 0"));
    }

    #[test]
    fn root_container_style_uses_viewport_height_and_flex() {
        let style = root_container_style();
        assert!(style.contains("height: 100vh"));
        assert!(style.contains("display: flex"));
    }

    #[test]
    fn bar_fill_width_is_clamped() {
        assert!(bar_fill_style(1.7, false).contains("width: 100.0%"));
        assert!(bar_fill_style(0.25, true).contains("width: 25.0%"));
        assert!(bar_fill_style(0.25, true).contains("#b0b7c3"));
    }
}
