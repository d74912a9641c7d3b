use std::thread;
use std::time::Duration;
use toutdoapp::model::NoteId;
use toutdoapp::test_utils::TestEnv;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_window_receives_pushes_from_another_thread() {
    let env = TestEnv::new();
    let api = env.open();
    let window = api.subscribe();

    let writer = {
        let api = api.clone();
        thread::spawn(move || {
            let milk = api.add_note("milk").unwrap();
            api.add_note("eggs").unwrap();
            api.toggle_pin(milk.id).unwrap();
        })
    };
    writer.join().unwrap();

    let revisions: Vec<u64> = (0..3)
        .map(|_| window.recv_timeout(WAIT).expect("missing push").revision)
        .collect();
    assert_eq!(revisions, vec![1, 2, 3]);

    let current = api.store().snapshot();
    assert_eq!(current.revision, 3);
    assert!(current.notes[0].pinned);
}

#[test]
fn test_observer_thread_sees_every_revision_in_order() {
    let env = TestEnv::new();
    let api = env.open();
    let subscription = api.subscribe();

    let observer = thread::spawn(move || {
        let mut seen = Vec::new();
        for snapshot in subscription {
            seen.push((snapshot.revision, snapshot.notes.len()));
            if snapshot.revision == 20 {
                break;
            }
        }
        seen
    });

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let api = api.clone();
            thread::spawn(move || {
                for i in 0..5 {
                    api.add_note(&format!("w{t} #{i}")).unwrap();
                }
            })
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }

    let seen = observer.join().unwrap();
    let expected: Vec<(u64, usize)> = (1..=20).map(|r| (r, r as usize)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_unsubscribed_window_gets_nothing_more() {
    let env = TestEnv::new();
    let api = env.open();
    let a = api.subscribe();
    let b = api.subscribe();

    api.add_note("one").unwrap();
    api.unsubscribe(a.id());
    api.add_note("two").unwrap();

    assert_eq!(a.pending().count(), 1);
    assert_eq!(b.pending().count(), 2);
}

#[test]
fn test_dropped_window_does_not_break_store() {
    let env = TestEnv::new();
    let api = env.open();
    let closed = api.subscribe();
    let open = api.subscribe();
    drop(closed);

    api.add_note("still works").unwrap();
    assert_eq!(api.store().subscriber_count(), 1);
    assert_eq!(open.try_recv().unwrap().notes.len(), 1);
}

#[test]
fn test_failed_reorder_then_resync() {
    let env = TestEnv::new();
    let api = env.open();
    let a = api.add_note("a").unwrap();
    let b = api.add_note("b").unwrap();
    let window = api.subscribe();

    // The window dragged against a stale list that still had note 99.
    let err = api
        .reorder_notes(&[b.id, NoteId::new(99), a.id])
        .unwrap_err();
    assert_eq!(err.kind, toutdoapp::ErrorKind::Validation);
    assert!(window.try_recv().is_none());

    // It re-adopts the authoritative list.
    let authoritative = api.list_notes();
    assert_eq!(authoritative[0].id, a.id);
    assert_eq!(authoritative[1].id, b.id);
}
