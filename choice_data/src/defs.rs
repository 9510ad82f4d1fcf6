use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use variantly::Variantly;

/// Blank command; also terminates every branch body in authored events.
pub const CODE_EMPTY: u16 = 0;
/// "Show Choices" - opens a choice menu block.
pub const CODE_SHOW_CHOICES: u16 = 102;
/// "When [option]" - branch taken when an option is picked.
pub const CODE_WHEN: u16 = 402;
/// "When Cancel" - branch taken when the menu is dismissed.
pub const CODE_WHEN_CANCEL: u16 = 403;
/// Closes a choice menu block.
pub const CODE_CHOICES_END: u16 = 404;

const CANCEL_BRANCH: i64 = -2;
const CANCEL_DISALLOW: i64 = -1;
const DEFAULT_NONE: i64 = -1;

static EMPTY_COMMAND: Command = Command {
    indent: 0,
    kind: CommandKind::Other {
        code: CODE_EMPTY,
        parameters: Vec::new(),
    },
};

/// A single authored event instruction.
///
/// Serialized in the host engine's event format: `{"code": 102, "indent": 0, "parameters": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCommand", into = "RawCommand")]
pub struct Command {
    pub indent: usize,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(indent: usize, kind: CommandKind) -> Self {
        Self { indent, kind }
    }

    /// The neutral command returned for lookups that fall outside a list.
    ///
    /// It matches none of the choice-menu kinds.
    pub fn empty() -> &'static Command {
        &EMPTY_COMMAND
    }

    pub fn open_choices(indent: usize, params: ChoiceParams) -> Self {
        Self::new(indent, CommandKind::OpenChoices(params))
    }

    pub fn option_branch(indent: usize, index: usize, label: impl Into<String>) -> Self {
        Self::new(
            indent,
            CommandKind::OptionBranch(BranchParams {
                index,
                label: Some(label.into()),
            }),
        )
    }

    pub fn cancel_branch(indent: usize, index: usize) -> Self {
        Self::new(indent, CommandKind::CancelBranch(BranchParams { index, label: None }))
    }

    pub fn end_choices(indent: usize) -> Self {
        Self::new(indent, CommandKind::EndChoices)
    }

    /// Any command the merger does not interpret (text, conditionals, body terminators...).
    pub fn other(indent: usize, code: u16, parameters: Vec<Value>) -> Self {
        Self::new(indent, CommandKind::Other { code, parameters })
    }

    /// Numeric instruction code as stored in event data.
    pub fn code(&self) -> u16 {
        match &self.kind {
            CommandKind::OpenChoices(_) => CODE_SHOW_CHOICES,
            CommandKind::OptionBranch(_) => CODE_WHEN,
            CommandKind::CancelBranch(_) => CODE_WHEN_CANCEL,
            CommandKind::EndChoices => CODE_CHOICES_END,
            CommandKind::Other { code, .. } => *code,
        }
    }

    pub fn is_open_choices(&self) -> bool {
        self.kind.is_open_choices()
    }

    /// True for both option and cancel branches.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, CommandKind::OptionBranch(_) | CommandKind::CancelBranch(_))
    }

    pub fn is_cancel_branch(&self) -> bool {
        self.kind.is_cancel_branch()
    }

    pub fn is_end_choices(&self) -> bool {
        self.kind.is_end_choices()
    }

    pub fn choice_params(&self) -> Option<&ChoiceParams> {
        self.kind.open_choices_ref()
    }

    /// Branch payload of an option or cancel branch.
    pub fn branch_params(&self) -> Option<&BranchParams> {
        self.kind
            .option_branch_ref()
            .or_else(|| self.kind.cancel_branch_ref())
    }

    pub fn branch_params_mut(&mut self) -> Option<&mut BranchParams> {
        if self.kind.is_option_branch() {
            self.kind.option_branch_mut()
        } else {
            self.kind.cancel_branch_mut()
        }
    }
}

/// Instruction kinds the choice merger recognizes. Everything else is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum CommandKind {
    OpenChoices(ChoiceParams),
    OptionBranch(BranchParams),
    CancelBranch(BranchParams),
    EndChoices,
    Other { code: u16, parameters: Vec<Value> },
}

/// Configuration of a single choice menu, as authored or after merging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChoiceParams {
    pub options: Vec<String>,
    pub cancel: CancelSelector,
    pub default: DefaultSelector,
    pub position: WindowPosition,
    pub background: Background,
}

impl ChoiceParams {
    /// Decode the raw `Show Choices` parameter array.
    ///
    /// Trailing parameters may be omitted. They fall back the same way the host's own
    /// choice setup does: a missing cancel type means branch, a missing default selects
    /// option 0, the window sits on the right and uses the normal background.
    ///
    /// # Errors
    /// Returns a `CommandDecodeError` when the option list is missing or a selector is out of range.
    pub fn from_parameters(params: &[Value]) -> Result<Self, CommandDecodeError> {
        let code = CODE_SHOW_CHOICES;
        let options = match params.first() {
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or(CommandDecodeError::InvalidParameter {
                        code,
                        index: 0,
                        expected: "array of strings",
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(CommandDecodeError::InvalidParameter {
                    code,
                    index: 0,
                    expected: "array of strings",
                });
            },
            None => return Err(CommandDecodeError::MissingParameter { code, index: 0 }),
        };

        let cancel = int_param(params, code, 1, Some(CANCEL_BRANCH))?;
        let cancel = CancelSelector::from_code(cancel).ok_or(CommandDecodeError::InvalidParameter {
            code,
            index: 1,
            expected: "cancel type (-2, -1 or an option index)",
        })?;
        let default = int_param(params, code, 2, Some(0))?;
        let default = DefaultSelector::from_code(default).ok_or(CommandDecodeError::InvalidParameter {
            code,
            index: 2,
            expected: "default type (-1 or an option index)",
        })?;
        let position = int_param(params, code, 3, Some(WindowPosition::default().code()))?;
        let position = WindowPosition::from_code(position).ok_or(CommandDecodeError::InvalidParameter {
            code,
            index: 3,
            expected: "window position (0, 1 or 2)",
        })?;
        let background = int_param(params, code, 4, Some(Background::default().code()))?;
        let background = Background::from_code(background).ok_or(CommandDecodeError::InvalidParameter {
            code,
            index: 4,
            expected: "background (0, 1 or 2)",
        })?;

        Ok(Self {
            options,
            cancel,
            default,
            position,
            background,
        })
    }

    /// Encode back into the raw parameter array the host engine consumes.
    pub fn to_parameters(&self) -> Vec<Value> {
        vec![
            Value::from(self.options.clone()),
            Value::from(self.cancel.code()),
            Value::from(self.default.code()),
            Value::from(self.position.code()),
            Value::from(self.background.code()),
        ]
    }
}

/// Payload of an option or cancel branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchParams {
    /// Option index the branch answers to.
    pub index: usize,
    /// Option label (cancel branches usually carry none).
    pub label: Option<String>,
}

impl BranchParams {
    fn from_parameters(code: u16, params: &[Value]) -> Result<Self, CommandDecodeError> {
        let index = int_param(params, code, 0, None)?;
        let index = usize::try_from(index).map_err(|_| CommandDecodeError::InvalidParameter {
            code,
            index: 0,
            expected: "non-negative option index",
        })?;
        let label = match params.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(CommandDecodeError::InvalidParameter {
                    code,
                    index: 1,
                    expected: "string label",
                });
            },
        };
        Ok(Self { index, label })
    }

    fn to_parameters(&self) -> Vec<Value> {
        vec![
            Value::from(self.index),
            self.label.clone().map_or(Value::Null, Value::String),
        ]
    }
}

/// What happens when the player dismisses the menu without choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelSelector {
    /// Cancel is not allowed.
    #[default]
    Disallow,
    /// Cancel runs the "When Cancel" branch.
    Branch,
    /// Cancel acts as picking this option.
    Choice(usize),
}

impl CancelSelector {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            CANCEL_BRANCH => Some(Self::Branch),
            CANCEL_DISALLOW => Some(Self::Disallow),
            n => usize::try_from(n).ok().map(Self::Choice),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Branch => CANCEL_BRANCH,
            Self::Disallow => CANCEL_DISALLOW,
            Self::Choice(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    /// Move a concrete option index forward by `offset`; sentinels are unaffected.
    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::Choice(n) => Self::Choice(n + offset),
            other => other,
        }
    }
}

/// Which option is highlighted when the menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultSelector {
    #[default]
    None,
    Choice(usize),
}

impl DefaultSelector {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            DEFAULT_NONE => Some(Self::None),
            n => usize::try_from(n).ok().map(Self::Choice),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::None => DEFAULT_NONE,
            Self::Choice(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::Choice(n) => Self::Choice(n + offset),
            Self::None => Self::None,
        }
    }
}

/// Screen placement of the choice window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPosition {
    Left,
    Middle,
    #[default]
    Right,
}

impl WindowPosition {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Background style of the choice window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Window,
    Dim,
    Transparent,
}

impl Background {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Window),
            1 => Some(Self::Dim),
            2 => Some(Self::Transparent),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Window => 0,
            Self::Dim => 1,
            Self::Transparent => 2,
        }
    }
}

/// Command exactly as stored in event JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    pub code: u16,
    #[serde(default)]
    pub indent: usize,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl TryFrom<RawCommand> for Command {
    type Error = CommandDecodeError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let kind = match raw.code {
            CODE_SHOW_CHOICES => CommandKind::OpenChoices(ChoiceParams::from_parameters(&raw.parameters)?),
            CODE_WHEN => CommandKind::OptionBranch(BranchParams::from_parameters(raw.code, &raw.parameters)?),
            CODE_WHEN_CANCEL => CommandKind::CancelBranch(BranchParams::from_parameters(raw.code, &raw.parameters)?),
            CODE_CHOICES_END => CommandKind::EndChoices,
            code => CommandKind::Other {
                code,
                parameters: raw.parameters,
            },
        };
        Ok(Command::new(raw.indent, kind))
    }
}

impl From<Command> for RawCommand {
    fn from(command: Command) -> Self {
        let code = command.code();
        let parameters = match command.kind {
            CommandKind::OpenChoices(params) => params.to_parameters(),
            CommandKind::OptionBranch(branch) | CommandKind::CancelBranch(branch) => branch.to_parameters(),
            CommandKind::EndChoices => Vec::new(),
            CommandKind::Other { parameters, .. } => parameters,
        };
        RawCommand {
            code,
            indent: command.indent,
            parameters,
        }
    }
}

/// Error raised when a recognized command carries parameters of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDecodeError {
    MissingParameter {
        code: u16,
        index: usize,
    },
    InvalidParameter {
        code: u16,
        index: usize,
        expected: &'static str,
    },
}

impl fmt::Display for CommandDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandDecodeError::MissingParameter { code, index } => {
                write!(f, "command {code} is missing parameter {index}")
            },
            CommandDecodeError::InvalidParameter { code, index, expected } => {
                write!(f, "command {code} parameter {index}: expected {expected}")
            },
        }
    }
}

impl std::error::Error for CommandDecodeError {}

/// Read an integer parameter; `null` or a missing slot falls back when a fallback is given.
fn int_param(params: &[Value], code: u16, index: usize, fallback: Option<i64>) -> Result<i64, CommandDecodeError> {
    match params.get(index) {
        None | Some(Value::Null) => fallback.ok_or(CommandDecodeError::MissingParameter { code, index }),
        Some(value) => value.as_i64().ok_or(CommandDecodeError::InvalidParameter {
            code,
            index,
            expected: "integer",
        }),
    }
}
