//! Hands the engine to presentation code. The provider owns the engine; handles
//! only reach it while the provider is alive.
use super::error::{ContextError, TeardownError};
use super::service::Storefront;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::error;

pub struct StorefrontProvider {
    engine: Rc<RefCell<Storefront>>,
}

#[derive(Clone, Default)]
pub struct StorefrontHandle {
    engine: Weak<RefCell<Storefront>>,
}

impl StorefrontProvider {
    pub fn new(engine: Storefront) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
        }
    }

    pub fn handle(&self) -> StorefrontHandle {
        StorefrontHandle {
            engine: Rc::downgrade(&self.engine),
        }
    }

    /// Detaches every handle and tears the engine down. Fails with
    /// `ContextError::InUse`, without flushing, when called from inside a
    /// handle's closure.
    pub fn teardown(self) -> Result<(), TeardownError> {
        let Some(engine) = Rc::into_inner(self.engine) else {
            error!("storefront still in use at teardown, skipping flush");
            return Err(ContextError::InUse.into());
        };
        engine.into_inner().teardown()?;
        Ok(())
    }
}

impl StorefrontHandle {
    /// A handle never attached to a provider.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.engine.strong_count() > 0
    }

    pub fn try_with<R>(&self, f: impl FnOnce(&mut Storefront) -> R) -> Result<R, ContextError> {
        let engine = self.engine.upgrade().ok_or(ContextError::OutsideProvider {
            consumer: "StorefrontHandle",
        })?;
        let mut engine = engine.try_borrow_mut().map_err(|_| ContextError::Reentrant)?;
        Ok(f(&mut engine))
    }

    /// Runs `f` against the engine.
    ///
    /// # Panics
    ///
    /// When the provider is gone or the engine is already borrowed. Both mean
    /// the host application is wired wrong.
    pub fn with<R>(&self, f: impl FnOnce(&mut Storefront) -> R) -> R {
        match self.try_with(f) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::product::{Catalog, Product};

    fn provider() -> StorefrontProvider {
        let catalog = Catalog::new(vec![Product::new(1, "A").set_price(10.0)]);
        let config = EngineConfig::new().set_temporary(true);
        StorefrontProvider::new(Storefront::open(config, catalog).unwrap())
    }

    #[test]
    fn handles_share_one_engine() {
        let provider = provider();
        let header = provider.handle();
        let grid = provider.handle();

        grid.with(|engine| engine.add_to_cart_by_id(1, 2));

        assert_eq!(header.with(|engine| engine.cart_count()), 2);
    }

    #[test]
    fn handle_fails_after_teardown() {
        let provider = provider();
        let handle = provider.handle();
        assert!(handle.is_attached());

        provider.teardown().unwrap();

        assert!(!handle.is_attached());
        assert_eq!(
            handle.try_with(|engine| engine.cart_count()).unwrap_err(),
            ContextError::OutsideProvider {
                consumer: "StorefrontHandle"
            }
        );
    }

    #[test]
    fn teardown_from_inside_a_handle_is_an_error() {
        let provider = provider();
        let handle = provider.handle();

        let result = handle.with(move |_| provider.teardown());

        assert!(matches!(
            result,
            Err(TeardownError::Context(ContextError::InUse))
        ));
        assert!(!handle.is_attached());
    }

    #[test]
    fn nested_borrow_is_reported() {
        let provider = provider();
        let outer = provider.handle();
        let inner = provider.handle();

        let nested = outer.with(|_| inner.try_with(|engine| engine.cart_count()));
        assert_eq!(nested, Err(ContextError::Reentrant));
    }

    #[test]
    #[should_panic(expected = "must be used within a StorefrontProvider")]
    fn detached_handle_panics() {
        StorefrontHandle::detached().with(|engine| engine.cart_count());
    }
}
