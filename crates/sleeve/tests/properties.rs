// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Behavioral guarantees shared by every wrapper configuration.

use futures::executor::block_on;
use rstest::rstest;
use sleeve::{Around, AsyncAround, AsyncGate, AsyncTryAround, Gate, TryAround, Wrapper};
use testing_aids::{Journal, TestError, yield_once};

/// Unified logic that records `start` and `end` around the action.
struct Bracket(Journal);

impl Around for Bracket {
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        self.0.record("start");
        let output = action();
        self.0.record("end");
        output
    }
}

impl TryAround for Bracket {
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        self.0.record("start");
        let output = action()?;
        self.0.record("end");
        Ok(output)
    }
}

impl AsyncAround for Bracket {
    async fn around_async<T, A, Fut>(&self, action: A) -> T
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        self.0.record("start");
        let output = action().await;
        self.0.record("end");
        output
    }
}

impl AsyncTryAround for Bracket {
    async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        self.0.record("start");
        let output = action().await?;
        self.0.record("end");
        Ok(output)
    }
}

fn split(journal: &Journal) -> Wrapper<impl Around + TryAround + AsyncAround + AsyncTryAround> {
    let before = journal.clone();
    let after = journal.clone();

    Wrapper::before_after(move || before.record("start"), move |()| after.record("end"))
}

#[test]
fn unified_order_is_start_action_end() {
    let journal = Journal::new();
    let wrapper = Wrapper::new(Bracket(journal.clone()));

    wrapper.call(|| journal.record("action"));
    assert_eq!(journal.entries(), ["start", "action", "end"]);

    wrapper.call(|| journal.record("action"));
    assert_eq!(journal.entries(), ["start", "action", "end", "start", "action", "end"]);
}

#[test]
fn split_order_is_start_action_end() {
    let journal = Journal::new();
    let wrapper = split(&journal);

    wrapper.call(|| journal.record("action"));
    wrapper.call(|| journal.record("action"));

    assert_eq!(journal.entries(), ["start", "action", "end", "start", "action", "end"]);
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(i64::MAX)]
fn integers_pass_through(#[case] value: i64) {
    let journal = Journal::new();

    assert_eq!(Wrapper::new(Bracket(journal.clone())).call(|| value), value);
    assert_eq!(split(&journal).call(|| value), value);
}

#[test]
fn values_of_every_type_pass_through() {
    let wrapper = Wrapper::new(Bracket(Journal::new()));

    assert_eq!(wrapper.call(|| "text".to_string()), "text");
    assert_eq!(wrapper.call(|| vec![1_u8, 2, 3]), [1, 2, 3]);
    assert_eq!(wrapper.call(|| Some(0.5_f64)), Some(0.5));
    assert_eq!(wrapper.call(|| Ok::<_, String>(1)), Ok(1));

    let boxed = Box::new(17);
    let address = std::ptr::from_ref(boxed.as_ref()).addr();
    let returned = wrapper.call(move || boxed);
    assert_eq!(std::ptr::from_ref(returned.as_ref()).addr(), address);
}

#[test]
fn failure_passes_through_with_identity() {
    let journal = Journal::new();
    let wrapper = Wrapper::new(Bracket(journal.clone()));

    let error = TestError::new("unified");
    let identity = error.identity();
    let result: Result<(), TestError> = wrapper.try_call(move || Err(error));

    let returned = result.unwrap_err();
    assert_eq!(returned.identity(), identity);
    assert_eq!(returned.message(), "unified");
    assert_eq!(journal.entries(), ["start"]);
}

#[test]
fn split_failure_skips_after() {
    let journal = Journal::new();
    let wrapper = split(&journal);

    let error = TestError::new("split");
    let identity = error.identity();
    let result: Result<u32, TestError> = wrapper.try_call(move || Err(error));

    assert_eq!(result.unwrap_err().identity(), identity);
    assert_eq!(journal.entries(), ["start"]);
}

#[test]
fn split_async_failure_skips_after() {
    let journal = Journal::new();
    let wrapper = split(&journal);

    let error = TestError::new("split async");
    let identity = error.identity();
    let result: Result<u32, TestError> = block_on(wrapper.try_call_async(move || async move {
        yield_once().await;
        Err(error)
    }));

    assert_eq!(result.unwrap_err().identity(), identity);
    assert_eq!(journal.entries(), ["start"]);
}

#[test]
fn async_order_survives_suspension() {
    let journal = Journal::new();

    let unified = Wrapper::new(Bracket(journal.clone()));
    block_on(unified.call_async(|| async {
        journal.record("action.start");
        yield_once().await;
        journal.record("action.end");
    }));
    assert_eq!(journal.entries(), ["start", "action.start", "action.end", "end"]);

    journal.clear();
    let split = split(&journal);
    block_on(split.call_async(|| async {
        journal.record("action.start");
        yield_once().await;
        journal.record("action.end");
    }));
    assert_eq!(journal.entries(), ["start", "action.start", "action.end", "end"]);
}

#[test]
fn interleaved_calls_each_get_their_own_bracket() {
    let journal = Journal::new();
    let wrapper = split(&journal);

    let first = wrapper.call_async(|| async {
        journal.record("first.start");
        yield_once().await;
        journal.record("first.end");
        1
    });
    let second = wrapper.call_async(|| async {
        journal.record("second.start");
        yield_once().await;
        journal.record("second.end");
        2
    });

    let outputs = block_on(futures::future::join(first, second));

    assert_eq!(outputs, (1, 2));
    assert_eq!(
        journal.entries(),
        [
            "start",
            "first.start",
            "start",
            "second.start",
            "first.end",
            "end",
            "second.end",
            "end"
        ]
    );
}

#[test]
fn one_wrapper_serves_many_output_types() {
    let journal = Journal::new();
    let wrapper = split(&journal);

    let number: i32 = wrapper.call(|| 42);
    let text: String = wrapper.call(|| "answer".to_string());
    wrapper.call(|| ());
    let parsed: Result<u16, _> = wrapper.try_call(|| "7".parse::<u16>());
    let awaited: Vec<char> = block_on(wrapper.call_async(|| async { vec!['a', 'b'] }));
    let awaited_result: Result<bool, TestError> = block_on(wrapper.try_call_async(|| async { Ok(true) }));

    assert_eq!(number, 42);
    assert_eq!(text, "answer");
    assert_eq!(parsed, Ok(7));
    assert_eq!(awaited, ['a', 'b']);
    assert_eq!(awaited_result, Ok(true));
    assert_eq!(journal.entries().len(), 12);
}

#[test]
fn nested_wrappers_compose_manually() {
    let journal = Journal::new();
    let outer_journal = journal.clone();
    let outer = Wrapper::around(move |proceed| {
        outer_journal.record("outer.start");
        let completed = proceed.run();
        outer_journal.record("outer.end");
        completed
    });
    let inner = split(&journal);

    let value = outer.call(|| inner.call(|| 5));

    assert_eq!(value, 5);
    assert_eq!(journal.entries(), ["outer.start", "start", "end", "outer.end"]);
}

/// Gate that records its decision and declines every action.
struct Decline(Journal);

impl Gate for Decline {
    type Rejection = TestError;

    fn gate<T, E, A>(&self, _action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
        E: From<TestError>,
    {
        self.0.record("declined");
        Err(TestError::new("declined").into())
    }
}

impl AsyncGate for Decline {
    type Rejection = TestError;

    async fn gate_async<T, E, A, Fut>(&self, _action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<TestError> + Send,
    {
        self.0.record("declined");
        Err(TestError::new("declined").into())
    }
}

#[test]
fn unified_logic_may_decline_the_action() {
    let journal = Journal::new();
    let wrapper = Wrapper::new(Decline(journal.clone()));

    let sync: Result<i32, TestError> = wrapper.call_gated(|| {
        journal.record("action");
        Ok(1)
    });
    let asynchronous: Result<String, TestError> = block_on(wrapper.call_gated_async(|| async {
        journal.record("action");
        Ok(String::from("never"))
    }));

    assert_eq!(sync.unwrap_err().message(), "declined");
    assert_eq!(asynchronous.unwrap_err().message(), "declined");
    assert_eq!(journal.entries(), ["declined", "declined"]);
}

#[test]
fn admitting_gate_passes_value_and_failure_through() {
    let journal = Journal::new();
    let wrapper = Wrapper::admit(|| Ok::<_, TestError>(()));

    let value: Result<i32, TestError> = wrapper.call_gated(|| {
        journal.record("action");
        Ok(4)
    });
    let error = TestError::new("admitted");
    let identity = error.identity();
    let failed: Result<(), TestError> = wrapper.call_gated(move || Err(error));

    assert_eq!(value.unwrap(), 4);
    assert_eq!(failed.unwrap_err().identity(), identity);
    assert_eq!(journal.entries(), ["action"]);
}
