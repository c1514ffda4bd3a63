#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Timezone {
    #[default]
    Local,
    Utc,
}
