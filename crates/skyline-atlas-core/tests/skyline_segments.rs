use skyline_atlas_core::skyline::{Fit, Segment, Skyline};

fn widths_sum(s: &Skyline) -> u32 {
    s.segments().iter().map(|seg| seg.width).sum()
}

#[test]
fn place_splits_the_segment_and_reports_top_left() {
    let mut s = Skyline::new(64, 32);
    let fit = s.fit(0, 10, 8, true).expect("fits");
    assert_eq!(fit, Fit { width: 10, height: 8, flipped: false });

    let pos = s.place(0, &fit);
    assert_eq!(pos, Some((0, 24)));
    assert_eq!(
        s.segments(),
        &[
            Segment { left: 0, width: 10, height: 8 },
            Segment { left: 10, width: 54, height: 0 },
        ]
    );
    assert_eq!(s.lowest(), 1);
}

#[test]
fn full_width_placement_flattens_into_one_segment() {
    let mut s = Skyline::new(64, 32);
    let a = s.fit(0, 32, 4, false).unwrap();
    s.place(0, &a);
    let b = s.fit(1, 32, 4, false).unwrap();
    assert_eq!(s.place(1, &b), Some((32, 28)));
    assert_eq!(s.segments(), &[Segment { left: 0, width: 64, height: 4 }]);
}

#[test]
fn fit_prefers_lower_orientation() {
    let s = Skyline::new(64, 64);
    let fit = s.fit(0, 10, 40, true).unwrap();
    assert!(fit.flipped);
    assert_eq!((fit.width, fit.height), (40, 10));

    let upright = s.fit(0, 10, 40, false).unwrap();
    assert!(!upright.flipped);
}

#[test]
fn fit_falls_back_to_rotation_when_only_rotated_fits() {
    // 8x14 does not fit under a 12 px ceiling, 14x8 does
    let s = Skyline::new(16, 12);
    let fit = s.fit(0, 8, 14, true).expect("rotated fit");
    assert!(fit.flipped);
    assert!(s.fit(0, 8, 14, false).is_none());
    assert!(s.fit(0, 17, 13, true).is_none());
}

#[test]
fn raise_lifts_to_lower_neighbour() {
    let mut s = Skyline::new(30, 20);
    let tall = s.fit(0, 10, 12, false).unwrap();
    s.place(0, &tall);
    let gap_fill = s.fit(1, 5, 6, false).unwrap();
    s.place(1, &gap_fill);
    // [0..10 @12][10..15 @6][15..30 @0]
    assert_eq!(s.lowest(), 2);

    assert!(s.raise(2));
    // no right neighbour, so the left one (6) bounds it and merges
    assert_eq!(
        s.segments(),
        &[
            Segment { left: 0, width: 10, height: 12 },
            Segment { left: 10, width: 20, height: 6 },
        ]
    );
    assert_eq!(widths_sum(&s), 30);

    s.raise(1);
    assert_eq!(s.segments(), &[Segment { left: 0, width: 30, height: 12 }]);
    assert!(!s.is_closed());
    s.raise(0);
    assert!(s.is_closed());
}

#[test]
fn lowest_picks_leftmost_on_ties() {
    let mut s = Skyline::new(30, 20);
    for (index, w, h) in [(0, 10, 3), (1, 5, 8), (2, 15, 3)] {
        let f = s.fit(index, w, h, false).unwrap();
        s.place(index, &f);
    }
    // [0..10 @3][10..15 @8][15..30 @3]
    assert_eq!(s.segments().len(), 3);
    assert_eq!(s.lowest(), 0);
}

#[test]
fn stale_index_or_oversized_fit_leaves_skyline_untouched() {
    let mut s = Skyline::new(32, 16);
    let fit = s.fit(0, 8, 8, false).unwrap();
    assert!(s.place(3, &fit).is_none());
    assert!(!s.raise(3));
    assert_eq!(s.segments(), &[Segment { left: 0, width: 32, height: 0 }]);

    s.place(0, &fit).expect("fits");
    // segment 0 is now 8 wide and 8 high: neither a wider nor a taller footprint may go there
    let wide = Fit { width: 9, height: 1, flipped: false };
    let tall = Fit { width: 8, height: 9, flipped: false };
    assert!(s.place(0, &wide).is_none());
    assert!(s.place(0, &tall).is_none());
    assert_eq!(
        s.segments(),
        &[
            Segment { left: 0, width: 8, height: 8 },
            Segment { left: 8, width: 24, height: 0 },
        ]
    );
}
