use std::collections::BTreeSet;

use crate::naming;
use crate::schema::Schema;
use crate::statement::UpdateTrigger;

/// Builds one before-update trigger per entity, refreshing its update timestamp.
#[must_use]
pub fn build_triggers(schema: &Schema) -> BTreeSet<UpdateTrigger> {
    schema
        .entity_names()
        .map(|name| {
            let trigger = UpdateTrigger {
                table: name.to_string(),
                column: naming::updated_column(name),
                function: naming::touch_function(name),
                trigger: naming::update_trigger(name),
            };
            naming::check_length("function", &trigger.function);
            naming::check_length("trigger", &trigger.trigger);
            trigger
        })
        .collect()
}
