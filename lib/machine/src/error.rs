use core::fmt::Display;
use kobj::KobjError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    /// The descriptor name is empty or cannot be used as an object name.
    InvalidName,
    /// A machine with the same name is already registered.
    DuplicateName,
    /// Backing storage for the registry could not be obtained.
    AllocationFailure,
    /// The descriptor is not currently registered.
    NotFound,
    /// Detection has not selected a machine.
    NoActiveMachine,
    /// The active machine does not implement the requested hook.
    HookAbsent,
    /// The object tree refused to publish the machine attributes.
    Attribute(KobjError),
}

impl From<KobjError> for MachineError {
    fn from(value: KobjError) -> Self {
        match value {
            KobjError::InvalidName => MachineError::InvalidName,
            KobjError::Exists => MachineError::DuplicateName,
            err => MachineError::Attribute(err),
        }
    }
}

impl Display for MachineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MachineError::InvalidName => f.write_str("invalid machine name"),
            MachineError::DuplicateName => f.write_str("machine name already registered"),
            MachineError::AllocationFailure => f.write_str("out of memory"),
            MachineError::NotFound => f.write_str("machine not registered"),
            MachineError::NoActiveMachine => f.write_str("no active machine"),
            MachineError::HookAbsent => f.write_str("hook not provided by machine"),
            MachineError::Attribute(err) => write!(f, "object tree: {}", err),
        }
    }
}
