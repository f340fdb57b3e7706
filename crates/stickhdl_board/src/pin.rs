use stickhdl_ir::Direction;

/// One physical package pin and its user configuration.
///
/// Setters return `&mut Self` so configuration chains:
/// `board.header("J1", 0)?.rename("S1").input().on();`
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    default_name: String,
    name: String,
    site: u16,
    direction: Option<Direction>,
    enabled: bool,
}

impl Pin {
    pub fn new(name: impl Into<String>, site: u16, direction: Option<Direction>) -> Self {
        let name = name.into();
        Self {
            default_name: name.clone(),
            name,
            site,
            direction,
            enabled: false,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn input(&mut self) -> &mut Self {
        self.direction = Some(Direction::Input);
        self
    }

    pub fn output(&mut self) -> &mut Self {
        self.direction = Some(Direction::Output);
        self
    }

    pub fn on(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    pub fn off(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name the board file gave this pin, before any `rename`.
    pub(crate) fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn site(&self) -> u16 {
        self.site
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
