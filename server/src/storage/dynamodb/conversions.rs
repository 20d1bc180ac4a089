use aws_sdk_dynamodb::types::AttributeValue;
use bulb_types::LightBulb;
use std::collections::HashMap;

pub(super) const ID: &str = "id";
const NAME: &str = "name";
const TYPE: &str = "type";
const WATTAGE: &str = "wattage";

pub(super) type Item = HashMap<String, AttributeValue>;

pub(super) fn key_value(id: i64) -> AttributeValue {
    AttributeValue::N(id.to_string())
}

pub(super) fn to_item(bulb: &LightBulb, id: i64) -> Item {
    HashMap::from([
        (ID.to_string(), key_value(id)),
        (NAME.to_string(), AttributeValue::S(bulb.name.clone())),
        (TYPE.to_string(), AttributeValue::S(bulb.bulb_type.clone())),
        (WATTAGE.to_string(), AttributeValue::N(bulb.wattage.to_string())),
    ])
}

/// Decode a table item. The error is a human-readable reason.
pub(super) fn from_item(item: &Item) -> Result<LightBulb, String> {
    Ok(LightBulb {
        id: Some(number(item, ID)?),
        name: string(item, NAME)?,
        bulb_type: string(item, TYPE)?,
        wattage: number(item, WATTAGE)?,
    })
}

fn attribute<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue, String> {
    item.get(name)
        .ok_or_else(|| format!("missing attribute '{name}'"))
}

fn string(item: &Item, name: &str) -> Result<String, String> {
    match attribute(item, name)? {
        AttributeValue::S(value) => Ok(value.clone()),
        _ => Err(format!("attribute '{name}' is not a string")),
    }
}

fn number<T: std::str::FromStr>(item: &Item, name: &str) -> Result<T, String> {
    match attribute(item, name)? {
        AttributeValue::N(value) => value
            .parse()
            .map_err(|_| format!("attribute '{name}' has out-of-range number {value}")),
        _ => Err(format!("attribute '{name}' is not a number")),
    }
}
