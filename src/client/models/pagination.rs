/// Numbered page buttons shown at most at once.
pub const PAGE_WINDOW: u32 = 5;

/// Pages to show as numbered buttons: up to `width` pages kept around
/// `current`, pinned to the first or last pages near the edges.
pub fn page_window(current: u32, total_pages: u32, width: u32) -> Vec<u32> {
    if total_pages == 0 || width == 0 {
        return Vec::new();
    }
    if total_pages <= width {
        return (1..=total_pages).collect();
    }
    let current = current.clamp(1, total_pages);
    let half = width / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages - width + 1
    } else {
        current - half
    };
    (start..start + width).collect()
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total_pages: u32) -> bool {
    current < total_pages
}

/// "Showing 3 of 27 appointments"
pub fn showing_label(shown: usize, total: u64, noun: &str) -> String {
    format!("Showing {} of {} {}", shown, total, noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_show_every_page() {
        assert_eq!(page_window(2, 3, PAGE_WINDOW), vec![1, 2, 3]);
        assert!(page_window(1, 0, PAGE_WINDOW).is_empty());
    }

    #[test]
    fn window_pins_to_edges_and_centres_otherwise() {
        assert_eq!(page_window(1, 10, PAGE_WINDOW), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10, PAGE_WINDOW), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10, PAGE_WINDOW), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(8, 10, PAGE_WINDOW), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10, PAGE_WINDOW), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn neighbours() {
        assert!(!has_previous(1));
        assert!(has_previous(2));
        assert!(has_next(1, 2));
        assert!(!has_next(2, 2));
        assert_eq!(showing_label(3, 27, "appointments"), "Showing 3 of 27 appointments");
    }
}
