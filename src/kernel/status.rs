use alloc::vec::Vec;
use core::fmt;

use spin::Mutex;

/// Kernel initialization status tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    NotStarted,
    InProgress,
    Completed,
    Failed(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct ComponentStatus {
    pub name: &'static str,
    pub status: InitStatus,
}

static INIT_STATUS: Mutex<Vec<ComponentStatus>> = Mutex::new(Vec::new());

impl ComponentStatus {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            status: InitStatus::NotStarted,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, InitStatus::Completed)
    }
}

/// Starts tracking a component; registering a name twice is a no-op.
pub fn register_component(name: &'static str) -> Result<(), &'static str> {
    let mut components = INIT_STATUS.lock();
    if components.iter().any(|c| c.name == name) {
        return Ok(());
    }
    components
        .try_reserve(1)
        .map_err(|_| "out of memory tracking components")?;
    components.push(ComponentStatus::new(name));
    Ok(())
}

pub fn update_component_status(name: &'static str, status: InitStatus) {
    let mut components = INIT_STATUS.lock();
    if let Some(component) = components.iter_mut().find(|c| c.name == name) {
        component.status = status;
    }
}

pub fn all_components_ready() -> bool {
    let components = INIT_STATUS.lock();
    !components.is_empty() && components.iter().all(ComponentStatus::is_complete)
}

/// Logs one line per tracked component.
pub fn report() {
    for component in INIT_STATUS.lock().iter() {
        log::info!("  {:<18} {}", component.name, component.status);
    }
}

impl fmt::Display for InitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStatus::NotStarted => write!(f, "Not Started"),
            InitStatus::InProgress => write!(f, "In Progress"),
            InitStatus::Completed => write!(f, "Completed"),
            InitStatus::Failed(err) => write!(f, "Failed: {}", err),
        }
    }
}
