use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use rustlexica_notify::{NotificationChannel, ObjectRef, Subscriber, TaggedValue};

/// Thread-safe mirror of a received payload, so tests can assert on what a
/// subscriber actually observed.
#[derive(Clone, Debug, PartialEq)]
enum Received {
    Bool(bool),
    Int8(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Option<String>),
    Pointer(usize),
    Object(usize),
}

impl Received {
    fn from_value(value: &TaggedValue) -> Self {
        match value {
            TaggedValue::Bool(v) => Received::Bool(*v),
            TaggedValue::Int8(v) => Received::Int8(*v),
            TaggedValue::Int(v) => Received::Int(*v),
            TaggedValue::Long(v) => Received::Long(*v),
            TaggedValue::Float(v) => Received::Float(*v),
            TaggedValue::Double(v) => Received::Double(*v),
            TaggedValue::Str(v) => Received::Str(v.clone()),
            TaggedValue::Pointer(v) => Received::Pointer(*v as usize),
            TaggedValue::Object(v) => Received::Object(Arc::as_ptr(v) as *const () as usize),
        }
    }
}

#[derive(Default)]
struct Recorder {
    received: Mutex<Vec<Received>>,
    objects: Mutex<Vec<ObjectRef>>,
}

impl Subscriber for Recorder {
    fn update(&self, _source: Option<&ObjectRef>, value: &TaggedValue) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Received::from_value(value));
        if let Some(object) = value.as_object() {
            self.objects
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::clone(object));
        }
    }
}

impl Recorder {
    fn received(&self) -> Vec<Received> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[test]
fn every_dispatch_helper_round_trips_its_kind() {
    let channel = NotificationChannel::new();
    let recorder = Arc::new(Recorder::default());
    channel.add_subscriber(Arc::clone(&recorder) as Arc<dyn Subscriber>);

    let marker = 0xD1C7usize as *const std::ffi::c_void;
    let object: ObjectRef = Arc::new("headword".to_string());
    let object_addr = Arc::as_ptr(&object) as *const () as usize;

    channel.dispatch_bool(true).unwrap();
    channel.dispatch_int8(-8).unwrap();
    channel.dispatch_int(32).unwrap();
    channel.dispatch_long(64).unwrap();
    channel.dispatch_float(0.5).unwrap();
    channel.dispatch_double(0.25).unwrap();
    channel.dispatch_string(Some("lexeme")).unwrap();
    channel.dispatch_string(None).unwrap();
    channel.dispatch_pointer(marker).unwrap();
    channel.dispatch_object(Arc::clone(&object)).unwrap();

    assert_eq!(
        recorder.received(),
        vec![
            Received::Bool(true),
            Received::Int8(-8),
            Received::Int(32),
            Received::Long(64),
            Received::Float(0.5),
            Received::Double(0.25),
            Received::Str(Some("lexeme".to_string())),
            Received::Str(None),
            Received::Pointer(marker as usize),
            Received::Object(object_addr),
        ]
    );
}

#[test]
fn dispatched_object_is_reference_equal() {
    let channel = NotificationChannel::new();
    let recorder = Arc::new(Recorder::default());
    channel.add_subscriber(Arc::clone(&recorder) as Arc<dyn Subscriber>);

    let object: ObjectRef = Arc::new(vec![1u8, 2, 3]);
    channel.dispatch_object(Arc::clone(&object)).unwrap();

    let captured = recorder
        .objects
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    assert_eq!(captured.len(), 1);
    assert!(Arc::ptr_eq(&captured[0], &object));
}

#[test]
fn owner_is_forwarded_as_source_while_alive() {
    struct SourceCheck {
        owner_addr: usize,
        matches: AtomicUsize,
    }

    impl Subscriber for SourceCheck {
        fn update(&self, source: Option<&ObjectRef>, _value: &TaggedValue) {
            let addr = source
                .map(|owner| Arc::as_ptr(owner) as *const () as usize)
                .unwrap_or(0);
            if addr == self.owner_addr {
                self.matches.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let owner = Arc::new(1234u64);
    let channel = NotificationChannel::with_owner(&owner);
    let check = Arc::new(SourceCheck {
        owner_addr: Arc::as_ptr(&owner) as *const () as usize,
        matches: AtomicUsize::new(0),
    });
    channel.add_subscriber(Arc::clone(&check) as Arc<dyn Subscriber>);

    channel.dispatch_int(1).unwrap();
    channel.dispatch_int(2).unwrap();
    assert_eq!(check.matches.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_dispatch_reaches_the_subscriber_every_time() {
    struct Tally(AtomicUsize);

    impl Subscriber for Tally {
        fn update(&self, _source: Option<&ObjectRef>, _value: &TaggedValue) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let channel = Arc::new(NotificationChannel::new());
    let tally = Arc::new(Tally(AtomicUsize::new(0)));
    channel.add_subscriber(Arc::clone(&tally) as Arc<dyn Subscriber>);

    let mut handles = Vec::new();
    for worker in 0..4 {
        let channel = Arc::clone(&channel);
        handles.push(thread::spawn(move || {
            for step in 0..25 {
                channel.dispatch_int(worker * 100 + step).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tally.0.load(Ordering::SeqCst), 100);
}
