//! Panel sizes for the explore view and the sidebar, persisted in cookies.

use serde::de::DeserializeOwned;

pub const LAYOUT_COOKIE: &str = "bugbee-panels:layout";
pub const COLLAPSED_COOKIE: &str = "bugbee-panels:collapsed";

/// List pane and detail pane, in percent of the available width.
pub type Layout = [f64; 2];

pub const DEFAULT_LAYOUT: Layout = [40.0, 60.0];
pub const LIST_MIN: f64 = 40.0;
pub const DETAIL_MIN: f64 = 35.0;

pub const TOGGLE_THRESHOLD: f64 = 10.0;
pub const NAV_COLLAPSED_SIZE: f64 = 4.0;
pub const NAV_MAX_SIZE: f64 = 14.0;

fn cookie_value<T: DeserializeOwned>(cookie_header: &str, name: &str) -> Option<T> {
    let raw = cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })?;
    let decoded = urlencoding::decode(raw).ok()?;
    serde_json::from_str(&decoded).ok()
}

/// Sizes from the layout cookie, or the default when it is missing or not
/// exactly two positive numbers. Stored sizes are rescaled to 100 and held
/// to the pane minimums.
pub fn read_layout(cookie_header: &str) -> Layout {
    match cookie_value::<Vec<f64>>(cookie_header, LAYOUT_COOKIE).as_deref() {
        Some(&[list, detail]) if list > 0.0 && detail > 0.0 => {
            resize_to(list * 100.0 / (list + detail))
        }
        Some(other) => {
            tracing::debug!(?other, "ignoring malformed layout cookie");
            DEFAULT_LAYOUT
        }
        None => DEFAULT_LAYOUT,
    }
}

pub fn layout_cookie(sizes: Layout) -> String {
    format!("{LAYOUT_COOKIE}=[{},{}]; path=/", sizes[0], sizes[1])
}

pub fn read_collapsed(cookie_header: &str) -> bool {
    cookie_value(cookie_header, COLLAPSED_COOKIE).unwrap_or(false)
}

pub fn collapsed_cookie(collapsed: bool) -> String {
    format!("{COLLAPSED_COOKIE}={collapsed}; path=/")
}

/// Put the divider at `list` percent, keeping both panes above their minimum.
pub fn resize_to(list: f64) -> Layout {
    let list = list.clamp(LIST_MIN, 100.0 - DETAIL_MIN);
    [list, 100.0 - list]
}

pub fn resize(sizes: Layout, delta: f64) -> Layout {
    resize_to(sizes[0] + delta)
}

pub fn clamp_sidebar(size: f64) -> f64 {
    size.clamp(NAV_COLLAPSED_SIZE, NAV_MAX_SIZE)
}

/// Whether dragging the sidebar to `size` flips its collapsed state.
pub fn sidebar_should_toggle(size: f64, collapsed: bool) -> bool {
    if collapsed {
        size > TOGGLE_THRESHOLD
    } else {
        size <= TOGGLE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_cookie_round_trips() {
        let header = format!("theme=dark; {}", layout_cookie([55.0, 45.0]));
        assert_eq!(read_layout(&header), [55.0, 45.0]);
        assert_eq!(read_layout("bugbee-panels:layout=%5B45%2C55%5D"), [45.0, 55.0]);
    }

    #[test]
    fn bad_cookies_fall_back_to_default() {
        for header in [
            "",
            "bugbee-panels:layout=nope",
            "bugbee-panels:layout=[40]",
            "bugbee-panels:layout=[40,60,10]",
            "bugbee-panels:layout=[0,100]",
            "other:layout=[30,70]",
        ] {
            assert_eq!(read_layout(header), DEFAULT_LAYOUT, "{header}");
        }
    }

    #[test]
    fn restored_layout_respects_minimums() {
        let [list, detail] = read_layout("bugbee-panels:layout=[5,200]");
        assert_eq!(list, LIST_MIN);
        assert_eq!(list + detail, 100.0);
        assert!(detail >= DETAIL_MIN);

        assert_eq!(read_layout("bugbee-panels:layout=[110,90]"), [55.0, 45.0]);
        assert_eq!(read_layout("bugbee-panels:layout=[90,10]"), [65.0, 35.0]);
    }

    #[test]
    fn resize_keeps_both_panes_usable() {
        assert_eq!(resize(DEFAULT_LAYOUT, 10.0), [50.0, 50.0]);
        assert_eq!(resize(DEFAULT_LAYOUT, -30.0), [LIST_MIN, 100.0 - LIST_MIN]);
        assert_eq!(resize_to(95.0), [65.0, 35.0]);
    }

    #[test]
    fn sidebar_toggles_across_threshold() {
        assert!(sidebar_should_toggle(8.0, false));
        assert!(sidebar_should_toggle(10.0, false));
        assert!(!sidebar_should_toggle(12.0, false));
        assert!(sidebar_should_toggle(12.0, true));
        assert!(!sidebar_should_toggle(4.0, true));
        assert_eq!(clamp_sidebar(1.0), NAV_COLLAPSED_SIZE);
        assert_eq!(clamp_sidebar(30.0), NAV_MAX_SIZE);
    }

    #[test]
    fn collapsed_cookie_round_trips() {
        assert!(read_collapsed(&collapsed_cookie(true)));
        assert!(!read_collapsed("bugbee-panels:collapsed=garbage"));
        assert!(!read_collapsed(""));
    }
}
