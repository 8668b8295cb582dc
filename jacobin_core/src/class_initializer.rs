use crate::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use crate::jvm_values::Value;
use crate::native_method_area::lookup_gfunction;
use crate::static_field_area::get_static_value;
use log::debug;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::LazyLock;
use std::thread::{self, ThreadId};

/// https://docs.oracle.com/javase/specs/jls/se21/html/jls-12.html#jls-12.4.2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClinitState {
    NotStarted,
    Running(ThreadId),
    Done,
    Erroneous,
}

struct ClinitBarrier {
    states: Mutex<HashMap<String, ClinitState>>,
    finished: Condvar,
}

static BARRIER: LazyLock<ClinitBarrier> = LazyLock::new(|| ClinitBarrier {
    states: Mutex::new(HashMap::new()),
    finished: Condvar::new(),
});

/// Marks the class `Erroneous` and wakes the waiters if the `<clinit>` body unwinds.
struct RunningGuard<'a> {
    class_name: &'a str,
    armed: bool,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            BARRIER
                .states
                .lock()
                .insert(self.class_name.to_string(), ClinitState::Erroneous);
            BARRIER.finished.notify_all();
        }
    }
}

pub fn clinit_state(class_name: &str) -> ClinitState {
    BARRIER
        .states
        .lock()
        .get(class_name)
        .copied()
        .unwrap_or(ClinitState::NotStarted)
}

/// Runs the class's `<clinit>` gfunction exactly once. Other threads wait for it to finish;
/// the initialising thread itself passes straight through.
pub fn ensure_initialized(class_name: &str) -> Result<(), ErrorBlock> {
    let me = thread::current().id();
    let mut states = BARRIER.states.lock();
    loop {
        match states
            .get(class_name)
            .copied()
            .unwrap_or(ClinitState::NotStarted)
        {
            ClinitState::Done => return Ok(()),
            ClinitState::Running(owner) if owner == me => return Ok(()),
            ClinitState::Running(_) => BARRIER.finished.wait(&mut states),
            ClinitState::Erroneous => {
                return Err(get_error_block(
                    ExceptionKind::NoClassDefFoundError,
                    format!("Could not initialize class {}", class_name.replace('/', ".")),
                ))
            }
            ClinitState::NotStarted => break,
        }
    }

    let Some(clinit) = lookup_gfunction(&format!("{}.<clinit>()V", class_name)) else {
        states.insert(class_name.to_string(), ClinitState::Done);
        return Ok(());
    };
    states.insert(class_name.to_string(), ClinitState::Running(me));
    drop(states);

    debug!("<clinit> {} running", class_name);
    let mut guard = RunningGuard {
        class_name,
        armed: true,
    };
    let result = (clinit.body)(&[]);
    guard.armed = false;

    let mut states = BARRIER.states.lock();
    let outcome = match result {
        Ok(_) => {
            states.insert(class_name.to_string(), ClinitState::Done);
            debug!("<clinit> {} done", class_name);
            Ok(())
        }
        Err(block) => {
            states.insert(class_name.to_string(), ClinitState::Erroneous);
            debug!("<clinit> {} failed: {}", class_name, block);
            Err(get_error_block(
                ExceptionKind::ExceptionInInitializerError,
                block.to_string(),
            ))
        }
    };
    BARRIER.finished.notify_all();
    outcome
}

/// `getstatic` with first-touch initialisation of the owning class.
pub fn get_static_initialized(class_name: &str, field_name: &str) -> Result<Value, ErrorBlock> {
    ensure_initialized(class_name)?;
    Ok(get_static_value(class_name, field_name))
}

#[cfg(test)]
mod tests {
    use crate::class_initializer::{clinit_state, ensure_initialized, get_static_initialized, ClinitState};
    use crate::java_exception::{get_error_block, ExceptionKind};
    use crate::jvm_values::Value;
    use crate::native_method_area::{register_gfunction, GFunctionResult, GMeth};
    use crate::static_field_area::{add_static, Static};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    static RUNS: AtomicUsize = AtomicUsize::new(0);

    fn counting_clinit(_args: &[Value]) -> GFunctionResult {
        RUNS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        // re-entry from the initialising thread must not block
        ensure_initialized("test/clinit/Counted")?;
        add_static("test/clinit/Counted.VALUE", Static::new("I", Value::Int(5)))?;
        Ok(None)
    }

    fn failing_clinit(_args: &[Value]) -> GFunctionResult {
        Err(get_error_block(ExceptionKind::ArithmeticException, "boom"))
    }

    fn panicking_clinit(_args: &[Value]) -> GFunctionResult {
        thread::sleep(Duration::from_millis(50));
        panic!("clinit body panicked");
    }

    #[test]
    fn test_runs_once_across_threads() {
        register_gfunction("test/clinit/Counted.<clinit>()V", GMeth::new(0, counting_clinit))
            .unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| get_static_initialized("test/clinit/Counted", "VALUE")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), Value::Int(5));
        }
        assert_eq!(RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(clinit_state("test/clinit/Counted"), ClinitState::Done);
    }

    #[test]
    fn test_trivial_class_is_done() {
        assert_eq!(clinit_state("test/clinit/Plain"), ClinitState::NotStarted);
        ensure_initialized("test/clinit/Plain").unwrap();
        assert_eq!(clinit_state("test/clinit/Plain"), ClinitState::Done);
    }

    #[test]
    fn test_failed_clinit_is_erroneous() {
        register_gfunction("test/clinit/Broken.<clinit>()V", GMeth::new(0, failing_clinit))
            .unwrap();
        let first = ensure_initialized("test/clinit/Broken").unwrap_err();
        assert_eq!(first.kind, ExceptionKind::ExceptionInInitializerError);
        let second = ensure_initialized("test/clinit/Broken").unwrap_err();
        assert_eq!(second.kind, ExceptionKind::NoClassDefFoundError);
        assert_eq!(clinit_state("test/clinit/Broken"), ClinitState::Erroneous);
    }

    #[test]
    fn test_panicking_clinit_releases_waiters() {
        register_gfunction("test/clinit/Panics.<clinit>()V", GMeth::new(0, panicking_clinit))
            .unwrap();
        let initialiser = thread::spawn(|| ensure_initialized("test/clinit/Panics"));
        thread::sleep(Duration::from_millis(10));
        let waiter = thread::spawn(|| ensure_initialized("test/clinit/Panics"));
        assert!(initialiser.join().is_err());
        let waited = waiter.join().unwrap().unwrap_err();
        assert_eq!(waited.kind, ExceptionKind::NoClassDefFoundError);
        assert_eq!(clinit_state("test/clinit/Panics"), ClinitState::Erroneous);
    }
}
