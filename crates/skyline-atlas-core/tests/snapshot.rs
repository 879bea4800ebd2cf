use skyline_atlas_core::prelude::*;

#[test]
fn snapshot_lists_frames_per_page() {
    let mut m = AtlasManager::default();
    let a = m.enqueue("hero", 100, 400).expect("enqueue");
    let b = m.enqueue("coin", 16, 16).expect("enqueue");
    m.pack_all().expect("pack");

    let snap = m.snapshot();
    assert_eq!(snap.pages.len(), 1);
    let page = &snap.pages[0];
    assert_eq!((page.width, page.height, page.tight), (512, 512, false));
    assert_eq!(page.frames.len(), 2);

    let hero = page.frames.iter().find(|f| f.image == a).expect("hero frame");
    assert_eq!(hero.key, "hero");
    assert!(hero.flipped);
    assert_eq!(hero.frame, Rect::new(0, 412, 400, 100));
    assert_eq!(hero.source_size, (100, 400));

    let coin = page.frames.iter().find(|f| f.image == b).expect("coin frame");
    assert_eq!(coin.frame, Rect::new(400, 496, 16, 16));
}

#[test]
fn snapshot_serializes_to_json() {
    let mut m = AtlasManager::default();
    m.enqueue("a", 10, 20).expect("enqueue");
    m.pack_all().expect("pack");

    let v = serde_json::to_value(m.snapshot()).expect("serialize");
    let frame = &v["pages"][0]["frames"][0];
    assert_eq!(frame["key"], "a");
    // laid flat: the footprint is the rotated 20x10
    assert_eq!(frame["flipped"], true);
    assert_eq!(frame["frame"]["w"], 20);
    assert_eq!(frame["frame"]["h"], 10);
    assert_eq!(frame["frame"]["y"], 502);
    assert_eq!(frame["source_size"][0], 10);
    assert_eq!(v["pages"][0]["width"], 512);
}

#[test]
fn stats_account_for_queue_and_area() {
    let mut m = AtlasManager::default();
    m.enqueue("a", 256, 256).expect("enqueue");
    m.enqueue("b", 256, 256).expect("enqueue");
    m.pack_all().expect("pack");
    m.enqueue("late", 8, 8).expect("enqueue");

    let stats = m.stats();
    assert_eq!(stats.num_atlases, 1);
    assert_eq!(stats.num_images, 2);
    assert_eq!(stats.num_queued, 1);
    assert_eq!(stats.total_atlas_area, 512 * 512);
    assert_eq!(stats.used_area, 2 * 256 * 256);
    assert!((stats.occupancy - 0.5).abs() < 1e-9);
    assert_eq!(stats.wasted_area(), 512 * 512 / 2);
    assert!((stats.waste_percentage() - 50.0).abs() < 1e-9);
    assert!(stats.summary().contains("Queued: 1"));
}

#[test]
fn empty_manager_reports_no_waste() {
    let m = AtlasManager::default();
    let stats = m.stats();
    assert_eq!(stats.num_atlases, 0);
    assert_eq!(stats.waste_percentage(), 0.0);
}
