use crate::layout::{tile_count, tile_positions};
use crate::substitution::SubstitutionTable;
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// Property: a span of exactly k tiles gets exactly k tiles at natural spacing
proptest! {
    #[test]
    fn prop_exact_multiple_tiles(k in 1usize..60, tile in 1.0f64..2000.0, start in 0.0f64..500.0) {
        let span = k as f64 * tile;
        prop_assert_eq!(tile_count(span, tile), k);

        let positions = tile_positions(start, span, tile);
        prop_assert_eq!(positions.len(), k);
        for pair in positions.windows(2) {
            prop_assert!(close(pair[1] - pair[0], tile));
        }
    }
}

// Property: any span is covered by ceil(span / tile) tiles with no drift
proptest! {
    #[test]
    fn prop_tiles_cover_span(span in 0.5f64..20000.0, tile in 1.0f64..2000.0, start in 0.0f64..500.0) {
        let positions = tile_positions(start, span, tile);
        let ratio = span / tile;
        if (ratio - ratio.round()).abs() > 1e-6 {
            prop_assert_eq!(positions.len(), (ratio.ceil() as usize).max(1));
        }

        // Tiles start with the span and end with it, or overhang it when it is short
        prop_assert!(close(positions[0], start));
        let last = positions[positions.len() - 1];
        prop_assert!(close(last + tile, start + span.max(tile)));

        if positions.len() > 1 {
            // Stretched spacing never opens a gap between tiles
            let step = positions[1] - positions[0];
            prop_assert!(step <= tile + 1e-9);
            prop_assert!(close((positions.len() - 1) as f64 * step + tile, span));
        }
        for pair in positions.windows(2) {
            prop_assert!(pair[1] >= pair[0]);
        }
    }
}

// Property: the order sets are listed in never changes the result
proptest! {
    #[test]
    fn prop_set_order_is_canonical(ch in proptest::char::range('A', 'F'), flip in any::<bool>()) {
        let table = SubstitutionTable::new()
            .with("ss01", [('C', 'x'), ('D', 'y')])
            .with("ss02", [('A', 'C'), ('B', 'D')])
            .with("ss03", [('C', 'E')]);

        let forward = ["ss01", "ss02", "ss03"];
        let backward = ["ss03", "ss02", "ss01"];
        let listed: &[&str] = if flip { &forward } else { &backward };
        prop_assert_eq!(table.resolve(ch, listed), table.resolve(ch, &forward));
    }
}

// Property: no enabled sets means no substitution
proptest! {
    #[test]
    fn prop_no_sets_is_identity(ch in any::<char>()) {
        let table = SubstitutionTable::new().with("ss02", [('A', 'B')]);
        prop_assert_eq!(table.resolve::<&str>(ch, &[]), ch);
    }
}
