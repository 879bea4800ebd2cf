use skyline_atlas_core::prelude::*;

fn strip(m: &mut AtlasManager, key: &str) -> ImageId {
    // two of these close a 512x512 atlas when laid flat
    m.enqueue(key, 256, 512).expect("enqueue")
}

#[test]
fn atlas_that_ran_out_of_room_is_tight() {
    let mut m = AtlasManager::default();
    let a = strip(&mut m, "a");
    let b = strip(&mut m, "b");
    let c = strip(&mut m, "c");
    m.pack_all().expect("pack");

    assert_eq!(m.atlas_count(), 2);
    let first = &m.atlases()[0];
    assert!(first.is_tight());
    assert_eq!(first.images(), &[a, b]);

    let second = &m.atlases()[1];
    assert!(!second.is_tight());
    assert_eq!(second.images(), &[c]);
}

#[test]
fn dequeue_from_tight_atlas_marks_it_loose() {
    let mut m = AtlasManager::default();
    let a = strip(&mut m, "a");
    let b = strip(&mut m, "b");
    strip(&mut m, "c");
    m.pack_all().expect("pack");

    let first = m.placement(a).unwrap().atlas;
    assert!(m.dequeue(a));

    let atlas = m.atlas(first).expect("atlas survives with one image");
    assert!(!atlas.is_tight());
    assert_eq!(atlas.images(), &[b]);
    assert_eq!(m.atlas_count(), 2);
}

#[test]
fn emptied_atlas_is_dropped() {
    let mut m = AtlasManager::default();
    strip(&mut m, "a");
    strip(&mut m, "b");
    let c = strip(&mut m, "c");
    m.pack_all().expect("pack");

    let lone = m.placement(c).unwrap().atlas;
    assert!(m.dequeue(c));
    assert!(m.atlas(lone).is_none());
    assert_eq!(m.atlas_count(), 1);
}

#[test]
fn next_repack_reclaims_loose_atlases() {
    let mut m = AtlasManager::default();
    let a = strip(&mut m, "a");
    let b = strip(&mut m, "b");
    let c = strip(&mut m, "c");
    m.pack_all().expect("pack");
    m.dequeue(a);

    let d = strip(&mut m, "d");
    m.pack_all().expect("repack");

    // both loose atlases were torn down; d opened a new one and pulled b in after it
    assert_eq!(m.atlas_count(), 2);
    let first = &m.atlases()[0];
    assert!(first.is_tight());
    assert_eq!(first.images(), &[d, b]);
    let pd = m.placement(d).unwrap();
    let pb = m.placement(b).unwrap();
    assert_eq!((pd.x, pd.y), (0, 256));
    assert_eq!((pb.x, pb.y), (0, 0));

    let second = &m.atlases()[1];
    assert!(!second.is_tight());
    assert_eq!(second.images(), &[c]);
    assert!(m.queued().is_empty());
}

#[test]
fn tight_atlases_survive_repacks() {
    let mut m = AtlasManager::default();
    let a = strip(&mut m, "a");
    strip(&mut m, "b");
    strip(&mut m, "c");
    m.pack_all().expect("pack");
    let tight_id = m.placement(a).unwrap().atlas;
    let before = *m.placement(a).unwrap();

    m.enqueue("big", 600, 600).expect("enqueue");
    m.pack_all().expect("repack");

    let atlas = m.atlas(tight_id).expect("tight atlas kept");
    assert!(atlas.is_tight());
    assert_eq!(*m.placement(a).unwrap(), before);
}

#[test]
fn requeue_moves_a_placed_image_back_to_the_queue() {
    let mut m = AtlasManager::default();
    let a = m.enqueue("a", 64, 64).expect("enqueue");
    let b = m.enqueue("b", 32, 32).expect("enqueue");
    m.pack_all().expect("pack");
    let seq_before = m.image(a).unwrap().sequence();
    assert!(seq_before < m.image(b).unwrap().sequence());

    assert!(m.requeue(a));
    // a requeued image orders after everything enqueued before it
    assert!(m.image(a).unwrap().sequence() > m.image(b).unwrap().sequence());
    assert!(m.is_queued(a));
    assert!(m.placement(a).is_none());
    assert_eq!(m.queued(), &[a]);
    assert_eq!(m.atlases()[0].images(), &[b]);

    m.pack_all().expect("repack");
    assert!(!m.is_queued(a));
    assert_eq!(m.atlas_count(), 1);
    assert_eq!(m.atlases()[0].images().len(), 2);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut m = AtlasManager::default();
    let a = m.enqueue("a", 64, 64).expect("enqueue");
    assert!(m.dequeue(a));
    assert!(!m.dequeue(a));
    assert!(!m.requeue(a));
    m.prepare_image(a).expect("no-op");
    assert_eq!(m.atlas_count(), 0);
}

#[test]
fn prepare_image_on_placed_image_is_a_no_op() {
    let mut m = AtlasManager::default();
    let a = m.enqueue("a", 64, 64).expect("enqueue");
    m.pack_all().expect("pack");
    let before = *m.placement(a).unwrap();
    m.prepare_image(a).expect("no-op");
    assert_eq!(m.atlas_count(), 1);
    assert_eq!(*m.placement(a).unwrap(), before);
}
