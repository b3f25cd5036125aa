//! Application services for floor task orchestration.

mod lifecycle;

pub use lifecycle::{
    CompleteTaskRequest, StartTaskRequest, TaskCompletion, TaskEngineError, TaskEngineResult,
    TaskLifecycleEngine,
};
