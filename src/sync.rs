#[cfg(not(feature = "sync"))]
pub trait Send {}
#[cfg(not(feature = "sync"))]
impl<T: ?Sized> Send for T {}

#[cfg(not(feature = "sync"))]
pub trait Sync {}
#[cfg(not(feature = "sync"))]
impl<T: ?Sized> Sync for T {}

#[cfg(feature = "sync")]
pub use std::marker::{Send, Sync};

/// Future spawned to deliver callbacks.
#[cfg(not(feature = "sync"))]
pub type BoxFuture<'a, T> = futures_core::future::LocalBoxFuture<'a, T>;

/// Future spawned to deliver callbacks.
#[cfg(feature = "sync")]
pub type BoxFuture<'a, T> = futures_core::future::BoxFuture<'a, T>;

/// Boxed one-shot callback.
#[cfg(not(feature = "sync"))]
pub type BoxFnOnce<T> = Box<dyn FnOnce(T)>;

/// Boxed one-shot callback.
#[cfg(feature = "sync")]
pub type BoxFnOnce<T> = Box<dyn FnOnce(T) + Send>;

#[cfg(not(feature = "sync"))]
pub(crate) type Ptr<T> = std::rc::Rc<T>;

#[cfg(feature = "sync")]
pub(crate) type Ptr<T> = std::sync::Arc<T>;

#[cfg(feature = "sync")]
pub(crate) type Lock<T> = spin::Mutex<T>;

#[cfg(not(feature = "sync"))]
#[repr(transparent)]
#[derive(Debug, Default)]
pub(crate) struct Lock<T: ?Sized> {
    cell: std::cell::RefCell<T>,
}

#[cfg(not(feature = "sync"))]
impl<T> Lock<T> {
    pub(crate) fn new(value: T) -> Self {
        Lock {
            cell: std::cell::RefCell::new(value),
        }
    }
}

#[cfg(not(feature = "sync"))]
impl<T> Lock<T>
where
    T: ?Sized,
{
    pub(crate) fn lock(&self) -> std::cell::RefMut<'_, T> {
        self.cell.borrow_mut()
    }
}
