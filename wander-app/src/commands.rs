use std::str::FromStr;
use uuid::Uuid;
use wander_catalog::{DecisionStatus, Season, StayType, TransportMode};
use wander_offer::{Side, SortKey, StatusGesture};
use crate::error::AppError;

/// A single filter field edit
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    Origin(Option<String>),
    Destination(Option<String>),
    Price(u64, u64),
    Status(Option<DecisionStatus>),
    Season(Option<Season>),
    StayType(Option<StayType>),
    Clear,
}

/// Console input, offers addressed by their 1-based position in the listing
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Refresh,
    Bounds,
    Filter(FilterEdit),
    Sort(SortKey),
    Status { position: usize, gesture: StatusGesture },
    Note { position: usize, text: String },
    Detail(usize),
    Pick(usize),
    Compare,
    CloseComparison,
    Skip(Side),
    Goto { side: Side, position: usize },
    Book { position: usize, party_size: u32, transport: TransportMode },
    Orders(usize),
    ConfirmOrder(Uuid),
    CancelOrder(Uuid),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list | refresh | bounds
  filter origin|destination <text>   (omit text to clear)
  filter price <min> <max>
  filter status|season|stay <value|any>
  filter clear
  sort status|price|date             (repeat to flip direction)
  accept|reject|undecide|up|down|cycle <n>
  note <n> <text> | detail <n> | pick <n>
  compare | close | skip left|right | goto left|right <k>
  book <n> <party size> <train_bus|plane|car_own|none>
  orders <n> | confirm-order <order id> | cancel-order <order id>
  help | quit";

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(usage("empty command"));
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "refresh" => Command::Refresh,
            "bounds" => Command::Bounds,
            "filter" => Command::Filter(parse_filter(&rest)?),
            "sort" => Command::Sort(parsed(arg(&rest, 0, "sort key")?)?),
            "accept" => status(&rest, StatusGesture::Set(DecisionStatus::Accepted))?,
            "reject" => status(&rest, StatusGesture::Set(DecisionStatus::Rejected))?,
            "undecide" => status(&rest, StatusGesture::Set(DecisionStatus::Undecided))?,
            "up" => status(&rest, StatusGesture::Upgrade)?,
            "down" => status(&rest, StatusGesture::Downgrade)?,
            "cycle" => status(&rest, StatusGesture::Cycle)?,
            "note" => Command::Note {
                position: position(&rest, 0)?,
                text: rest.get(1..).map(|w| w.join(" ")).unwrap_or_default(),
            },
            "detail" => Command::Detail(position(&rest, 0)?),
            "pick" => Command::Pick(position(&rest, 0)?),
            "compare" => Command::Compare,
            "close" => Command::CloseComparison,
            "skip" => Command::Skip(parsed(arg(&rest, 0, "side")?)?),
            "goto" => Command::Goto {
                side: parsed(arg(&rest, 0, "side")?)?,
                position: position(&rest, 1)?,
            },
            "book" => Command::Book {
                position: position(&rest, 0)?,
                party_size: number(arg(&rest, 1, "party size")?)?,
                transport: parsed(arg(&rest, 2, "transport mode")?)?,
            },
            "orders" => Command::Orders(position(&rest, 0)?),
            "confirm-order" => Command::ConfirmOrder(parsed(arg(&rest, 0, "order id")?)?),
            "cancel-order" => Command::CancelOrder(parsed(arg(&rest, 0, "order id")?)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(usage(&format!("unknown command '{}', try 'help'", other))),
        };
        Ok(command)
    }
}

fn parse_filter(rest: &[&str]) -> Result<FilterEdit, AppError> {
    let field = arg(rest, 0, "filter field")?.to_ascii_lowercase();
    let text = rest.get(1..).map(|w| w.join(" ")).filter(|t| !t.is_empty());
    let value = rest.get(1).copied().filter(|v| !v.eq_ignore_ascii_case("any"));

    let edit = match field.as_str() {
        "origin" => FilterEdit::Origin(text),
        "destination" | "dest" => FilterEdit::Destination(text),
        "price" => FilterEdit::Price(number(arg(rest, 1, "min price")?)?, number(arg(rest, 2, "max price")?)?),
        "status" => FilterEdit::Status(value.map(parsed).transpose()?),
        "season" => FilterEdit::Season(value.map(parsed).transpose()?),
        "stay" => FilterEdit::StayType(value.map(parsed).transpose()?),
        "clear" => FilterEdit::Clear,
        other => return Err(usage(&format!("unknown filter field '{}'", other))),
    };
    Ok(edit)
}

fn status(rest: &[&str], gesture: StatusGesture) -> Result<Command, AppError> {
    Ok(Command::Status { position: position(rest, 0)?, gesture })
}

fn arg<'a>(rest: &[&'a str], index: usize, name: &str) -> Result<&'a str, AppError> {
    rest.get(index).copied().ok_or_else(|| usage(&format!("missing {}", name)))
}

/// Whole number that must fit the target type; out of range is a usage error
fn number<T: FromStr>(word: &str) -> Result<T, AppError> {
    word.parse().map_err(|_| usage(&format!("'{}' is not a valid number", word)))
}

/// Named value such as a sort key or side; a bad word is the user's mistake
fn parsed<T>(word: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    word.parse().map_err(|e: T::Err| usage(&e.to_string()))
}

fn position(rest: &[&str], index: usize) -> Result<usize, AppError> {
    match number::<usize>(arg(rest, index, "offer number")?)? {
        0 => Err(usage("offer numbers start at 1")),
        n => Ok(n),
    }
}

fn usage(msg: &str) -> AppError {
    AppError::UsageError(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_commands() {
        assert_eq!(
            "accept 2".parse::<Command>().unwrap(),
            Command::Status { position: 2, gesture: StatusGesture::Set(DecisionStatus::Accepted) }
        );
        assert_eq!(
            "cycle 1".parse::<Command>().unwrap(),
            Command::Status { position: 1, gesture: StatusGesture::Cycle }
        );
        assert!("accept 0".parse::<Command>().is_err());
        assert!("accept".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            "filter price 100 500".parse::<Command>().unwrap(),
            Command::Filter(FilterEdit::Price(100, 500))
        );
        assert_eq!(
            "filter destination Costa Brava".parse::<Command>().unwrap(),
            Command::Filter(FilterEdit::Destination(Some("Costa Brava".to_string())))
        );
        assert_eq!(
            "filter origin".parse::<Command>().unwrap(),
            Command::Filter(FilterEdit::Origin(None))
        );
        assert_eq!(
            "filter season any".parse::<Command>().unwrap(),
            Command::Filter(FilterEdit::Season(None))
        );
        assert_eq!(
            "filter stay beach".parse::<Command>().unwrap(),
            Command::Filter(FilterEdit::StayType(Some(StayType::Beach)))
        );
        assert!("filter status maybe".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_comparison_and_booking() {
        assert_eq!("skip right".parse::<Command>().unwrap(), Command::Skip(Side::Right));
        assert_eq!(
            "goto left 3".parse::<Command>().unwrap(),
            Command::Goto { side: Side::Left, position: 3 }
        );
        assert_eq!(
            "book 1 2 plane".parse::<Command>().unwrap(),
            Command::Book { position: 1, party_size: 2, transport: TransportMode::Plane }
        );
        assert_eq!(
            "note 4 ask about ferries".parse::<Command>().unwrap(),
            Command::Note { position: 4, text: "ask about ferries".to_string() }
        );
    }

    #[test]
    fn test_parse_order_commands() {
        let id = Uuid::new_v4();
        assert_eq!(
            format!("confirm-order {}", id).parse::<Command>().unwrap(),
            Command::ConfirmOrder(id)
        );
        assert_eq!(
            format!("cancel-order {}", id).parse::<Command>().unwrap(),
            Command::CancelOrder(id)
        );
        assert_eq!("orders 3".parse::<Command>().unwrap(), Command::Orders(3));

        let err = "cancel-order 42".parse::<Command>().unwrap_err();
        assert!(matches!(err, AppError::UsageError(_)));
    }

    #[test]
    fn test_party_size_out_of_range() {
        let err = "book 1 4294967298 plane".parse::<Command>().unwrap_err();
        assert!(matches!(err, AppError::UsageError(_)));
        assert!(err.user_message().contains("4294967298"));
        assert!("book 1 -2 plane".parse::<Command>().is_err());
    }

    #[test]
    fn test_mistyped_values_are_usage_errors() {
        for line in ["sort foo", "skip up", "filter status maybe", "goto middle 2", "book 1 2 boat"] {
            let err = line.parse::<Command>().unwrap_err();
            assert!(matches!(err, AppError::UsageError(_)), "{}", line);
            assert_ne!(err.user_message(), "Internal error");
        }
        let err = "sort foo".parse::<Command>().unwrap_err();
        assert!(err.user_message().contains("Unknown sort key: foo"));
    }

    #[test]
    fn test_unknown_command() {
        let err = "dance".parse::<Command>().unwrap_err();
        assert!(err.user_message().contains("unknown command"));
    }
}
