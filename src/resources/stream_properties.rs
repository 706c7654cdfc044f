// Copyright 2025 The Econ Model API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stream Properties: yields, shrinkage, loss/flare and BTU content.

use std::sync::Arc;

use super::econ_model::base_table;
use super::Resource;
use crate::fields::{Bounds, FieldDescriptor, FieldKind, FieldTable, RowsSpec};

pub const LABEL: &str = "StreamProperties";

const ROWS_CALCULATION_METHODS: &[&str] = &["monotonic", "non_monotonic"];
const SHRINK_CONDITIONS: &[&str] = &["shrunk", "unshrunk"];
const RATE_TYPES: &[&str] = &["gross_well_head", "gross_sales", "net_sales"];

fn object(table: FieldTable) -> FieldKind {
    FieldKind::Object(Arc::new(table))
}

/// `{ rows: [...] }` with the given row value columns.
fn rows_object(columns: FieldTable) -> FieldKind {
    object(FieldTable::new([FieldDescriptor::new(
        "rows",
        "rows",
        FieldKind::Rows(RowsSpec::new(LABEL, columns)),
    )
    .required()]))
}

fn rows_calculation_method() -> FieldDescriptor {
    FieldDescriptor::new(
        "rowsCalculationMethod",
        "rows_calculation_method",
        FieldKind::Enum(ROWS_CALCULATION_METHODS),
    )
    .required()
}

fn rate_type() -> FieldDescriptor {
    FieldDescriptor::new(
        "rateType",
        "rate_type",
        FieldKind::Fixed {
            allowed: RATE_TYPES,
            value: "gross_well_head",
        },
    )
}

fn yield_rows() -> FieldKind {
    rows_object(FieldTable::new([
        FieldDescriptor::new("yield", "yield", FieldKind::Number(Bounds::NON_NEGATIVE)).required(),
        FieldDescriptor::new(
            "shrinkCondition",
            "shrink_condition",
            FieldKind::Enum(SHRINK_CONDITIONS),
        )
        .required(),
    ]))
}

fn pct_remaining_rows() -> FieldKind {
    rows_object(FieldTable::new([FieldDescriptor::new(
        "pctRemaining",
        "pct_remaining",
        FieldKind::Number(Bounds::PERCENT),
    )
    .required()]))
}

fn yields() -> FieldTable {
    FieldTable::new([
        rows_calculation_method(),
        FieldDescriptor::new("ngl", "ngl", yield_rows()).required(),
        FieldDescriptor::new("dripCondensate", "drip_condensate", yield_rows()).required(),
    ])
}

fn shrinkage() -> FieldTable {
    FieldTable::new([
        rows_calculation_method(),
        rate_type(),
        FieldDescriptor::new("oil", "oil", pct_remaining_rows()).required(),
        FieldDescriptor::new("gas", "gas", pct_remaining_rows()).required(),
    ])
}

fn loss_flare() -> FieldTable {
    FieldTable::new([
        rows_calculation_method(),
        rate_type(),
        FieldDescriptor::new("oilLoss", "oil_loss", pct_remaining_rows()).required(),
        FieldDescriptor::new("gasLoss", "gas_loss", pct_remaining_rows()).required(),
        FieldDescriptor::new("gasFlare", "gas_flare", pct_remaining_rows()).required(),
    ])
}

fn btu_content() -> FieldTable {
    FieldTable::new([
        FieldDescriptor::new("unshrunkGas", "unshrunk_gas", FieldKind::Number(Bounds::NON_NEGATIVE))
            .required(),
        FieldDescriptor::new("shrunkGas", "shrunk_gas", FieldKind::Number(Bounds::NON_NEGATIVE))
            .required(),
    ])
}

pub fn stream_properties() -> Resource {
    let table = base_table().merge(FieldTable::new([
        FieldDescriptor::new("yields", "econ_function.yields", object(yields())).required(),
        FieldDescriptor::new("shrinkage", "econ_function.shrinkage", object(shrinkage())).required(),
        FieldDescriptor::new("lossFlare", "econ_function.loss_flare", object(loss_flare())).required(),
        FieldDescriptor::new("btuContent", "econ_function.btu_content", object(btu_content())).required(),
    ]));

    Resource {
        kind: "stream-properties",
        label: LABEL,
        assumption_key: "stream_properties",
        table,
    }
}
