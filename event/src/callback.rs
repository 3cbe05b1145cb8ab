use std::sync::Arc;

/// A shared callable of signature `Fn(A) -> R`.
///
/// Multi-argument callables take a tuple: `Callback<(i32, i32), i32>`.
pub type Callback<A, R> = Arc<dyn Fn(A) -> R + Send + Sync + 'static>;

/// Trait for types that can be stored as the current callable of an event.
pub trait IntoCallback<A, R> {
    fn into_callback(self) -> Callback<A, R>;
}

// Closures and fn items
impl<F, A, R> IntoCallback<A, R> for F
where F: Fn(A) -> R + Send + Sync + 'static
{
    fn into_callback(self) -> Callback<A, R> { Arc::new(self) }
}

// An already shared callable is stored as-is, without another layer of indirection
impl<A, R> IntoCallback<A, R> for Callback<A, R> {
    fn into_callback(self) -> Callback<A, R> { self }
}

impl<A> IntoCallback<A, ()> for std::sync::mpsc::Sender<A>
where A: Send + 'static
{
    fn into_callback(self) -> Callback<A, ()> {
        Arc::new(move |value| {
            let _ = self.send(value); // receiver gone
        })
    }
}

#[cfg(feature = "tokio")]
impl<A> IntoCallback<A, ()> for tokio::sync::mpsc::UnboundedSender<A>
where A: Send + 'static
{
    fn into_callback(self) -> Callback<A, ()> {
        Arc::new(move |value| {
            let _ = self.send(value); // receiver gone
        })
    }
}
