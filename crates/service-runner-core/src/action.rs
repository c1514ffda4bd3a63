use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Display, EnumString, EnumIter, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[strum(serialize_all = "kebab-case")]
pub enum LifecycleAction {
    Install,
    Uninstall,
    Start,
    Stop,
}

impl LifecycleAction {
    /// Operator-facing verb used in lifecycle reports.
    pub fn verb(&self) -> &'static str {
        match self {
            LifecycleAction::Install => "Install",
            LifecycleAction::Uninstall => "Uninstall",
            LifecycleAction::Start => "Start",
            LifecycleAction::Stop => "Stop",
        }
    }

    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}
