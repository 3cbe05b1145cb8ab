/*!
Stable callback handles that always call the latest closure.

A long-lived consumer (an interval timer, a channel listener, an effect with a dependency list)
wants to hold on to one callable for its whole life. The code that produces that callable
re-runs all the time and closes over fresh values each time. `stable-event` joins the two:
the producer keeps calling [`StableEvent::construct`] with whatever closure it has now, and the
consumer keeps one [`Handle`] that never changes identity but always runs the newest closure.

# Design requirements:
- Handle identity is fixed for the lifetime of its logical instance (compare with `==`, hash it, or use [`Handle::id`])
- Every construction overwrites the stored closure synchronously, before returning
- Invocation looks the closure up at call time, never at the time the handle was obtained
- There is no empty state once constructed, and a disposed instance leaves its handles callable
- No error conditions of our own: whatever the closure returns (or panics with) reaches the caller unchanged

# Basic usage

```rust
use stable_event::*;

let event = StableEvent::<(i32, i32), i32>::new();
let add = event.construct(|(x, y)| x + y);
assert_eq!(add.call((2, 3)), 5);

// the owner re-evaluates with a new closure; the handle stays the same
let again = event.construct(|(x, y)| x * y);
assert_eq!(add, again);
assert_eq!(add.call((2, 3)), 6);
```

# Scope usage

```rust
use stable_event::*;
use std::sync::{Arc, Mutex};

let seen = Arc::new(Mutex::new(Vec::new()));
let mut scope = Scope::new("greeter");

for name in ["Buffy", "Willow"] {
    let seen = seen.clone();
    scope.render(move |cx| {
        let greet = cx.use_event(move |_: ()| format!("hello {name}"));
        // depends only on the handle, so this runs once, on the first pass
        cx.use_effect(greet.clone(), move || {
            seen.lock().unwrap().push(greet.call(()));
            Cleanup::none()
        });
    });
}

assert_eq!(*seen.lock().unwrap(), ["hello Buffy"]);
scope.dispose();
```

*/

mod callback;
mod cell;
mod event;
mod handle;
pub mod scope;

pub use callback::*;
pub use cell::*;
pub use event::*;
pub use handle::*;
pub use scope::{Cleanup, RenderContext, Scope};
