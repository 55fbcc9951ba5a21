mod dispatcher;
mod effect;
mod progress;

pub use dispatcher::{DispatchOptions, LineDispatcher};
pub use effect::{Effect, Effects};
pub use progress::{
    CausticState, FumeFxState, MentalRayState, ProgressState, RendermanState, VrayState,
};
