/// Capabilities shared by every environment an agent can act in.
///
/// Environments own their ground truth; agents only see what these methods
/// expose plus whatever observation type the concrete environment offers
/// (true rewards for the testbed, grid snapshots for the game).
pub trait Environment {
    /// What an agent submits to the environment.
    type Action: Copy;

    /// Actions an agent may currently take, in a stable order.
    ///
    /// Empty once the environment is terminal.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Whether the episode is over.
    fn is_terminal(&self) -> bool;
}
