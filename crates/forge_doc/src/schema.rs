//! Per-entity field dispatch tables
//!
//! Each entity type declares one static table listing its fields in the
//! order they are written. Reading accepts any order, skips keys the table
//! does not know and leaves absent or null fields at their defaults.

use crate::cursor::Cursor;
use crate::emitter::Emitter;
use crate::error::DocResult;

/// Reads one field's value into the entity
pub type DecodeFn<T> = fn(&mut T, &mut Cursor) -> DocResult<()>;

/// Writes one field's value
pub type EncodeFn<T> = fn(&T, &mut Emitter);

/// A single document field
pub struct Field<T> {
    pub key: &'static str,
    pub decode: DecodeFn<T>,
    pub encode: EncodeFn<T>,
}

impl<T> Field<T> {
    pub const fn new(key: &'static str, decode: DecodeFn<T>, encode: EncodeFn<T>) -> Self {
        Self {
            key,
            decode,
            encode,
        }
    }
}

/// The field schema of one entity type
pub struct FieldTable<T: 'static> {
    entity: &'static str,
    fields: &'static [Field<T>],
}

impl<T: 'static> FieldTable<T> {
    pub const fn new(entity: &'static str, fields: &'static [Field<T>]) -> Self {
        Self { entity, fields }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Keys in write order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    fn field(&self, key: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Decode a mapping into `target`, one field at a time
    pub fn decode_entity(&self, cursor: &mut Cursor, target: &mut T) -> DocResult<()> {
        if cursor.next_is_null() {
            return Ok(());
        }
        cursor.expect_mapping_start()?;

        while !cursor.next_is_mapping_end()? {
            let key = cursor.expect_scalar()?;
            match self.field(&key.value) {
                Some(field) => {
                    if cursor.next_is_null() {
                        continue;
                    }
                    (field.decode)(target, cursor)?;
                }
                None => {
                    log::debug!("{}: ignoring unknown field '{}'", self.entity, key.value);
                    cursor.skip_node()?;
                }
            }
        }
        Ok(())
    }

    /// Write `value` as a mapping in table order
    pub fn encode_entity(&self, value: &T, out: &mut Emitter) {
        out.mapping_start();
        for field in self.fields {
            out.key(field.key);
            (field.encode)(value, out);
        }
        out.mapping_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Light {
        name: String,
        intensity: f32,
        enabled: bool,
    }

    static LIGHT: FieldTable<Light> = FieldTable::new(
        "Light",
        &[
            Field::new(
                "name",
                |l, c| {
                    l.name = c.decode()?;
                    Ok(())
                },
                |l, out| out.emit(&l.name),
            ),
            Field::new(
                "intensity",
                |l, c| {
                    l.intensity = c.decode()?;
                    Ok(())
                },
                |l, out| out.emit(&l.intensity),
            ),
            Field::new(
                "enabled",
                |l, c| {
                    l.enabled = c.decode()?;
                    Ok(())
                },
                |l, out| out.emit(&l.enabled),
            ),
        ],
    );

    fn decode(text: &str) -> DocResult<Light> {
        let mut cursor = Cursor::parse(text)?;
        let mut light = Light::default();
        LIGHT.decode_entity(&mut cursor, &mut light)?;
        cursor.finish()?;
        Ok(light)
    }

    #[test]
    fn test_any_order_and_unknown_keys() {
        let light = decode("enabled: true\nextra:\n  nested: [1, 2]\nname: Sun\n").unwrap();
        assert_eq!(
            light,
            Light {
                name: "Sun".to_string(),
                intensity: 0.0,
                enabled: true
            }
        );
    }

    #[test]
    fn test_canonical_write_order() {
        let light = decode("enabled: false\nintensity: 1.5\nname: Lamp\n").unwrap();
        let mut out = Emitter::new();
        LIGHT.encode_entity(&light, &mut out);
        assert_eq!(out.finish(), "name: Lamp\nintensity: 1.5\nenabled: false\n");
        assert_eq!(LIGHT.keys().collect::<Vec<_>>(), ["name", "intensity", "enabled"]);
    }

    #[test]
    fn test_empty_and_null_values_keep_defaults() {
        assert_eq!(decode("").unwrap(), Light::default());
        assert_eq!(decode("{}").unwrap(), Light::default());
        assert_eq!(decode("intensity:\nname: ~\n").unwrap(), Light::default());
    }

    #[test]
    fn test_wrong_shape_fails() {
        assert!(decode("- a\n- b\n").is_err());
        assert!(decode("intensity: [1]\n").is_err());
    }
}
