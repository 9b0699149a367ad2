//! Routes outside the wizard and the hook used to reach them

/// Navigation targets owned by the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Go to dashboard
    Dashboard,
    /// Go to the interact-with-contracts flow
    InteractWithContracts,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::InteractWithContracts => "/interact-with-contracts",
        }
    }
}

/// Implemented by the host router
pub trait Navigator {
    fn navigate(&self, route: Route);
}
