use std::collections::BTreeSet;

use dioxus::prelude::*;

use crate::domain::entities::aggregate::{PivotTable, OTHER_LABEL};
use crate::format::format_number_with_commas;
use crate::ui::style::{
    bar_fill_style, table_cell_style, table_container_style, table_header_cell_style,
};
use crate::ui::view::{is_selected, toggle_selection, BarRow};

#[component]
pub fn KpiTile(label: String, value: String) -> Element {
    rsx! {
        div {
            style: "flex: 1; border: 1px solid #ddd; border-radius: 8px; padding: 10px 14px;",
            div { style: "color: #666; font-size: 13px;", "{label}" }
            div { style: "font-size: 24px; font-weight: 600; margin-top: 4px;", "{value}" }
        }
    }
}

#[component]
pub fn BarChart(title: String, rows: Vec<BarRow>) -> Element {
    rsx! {
        div { style: "flex: 1; min-width: 320px; margin-bottom: 16px;",
            h3 { style: "margin: 8px 0;", "{title}" }
            if rows.is_empty() {
                p { style: "color: #888;", "No data for the current filters" }
            }
            {rows.iter().map(|row| {
                let fill = bar_fill_style(row.fraction, row.label == OTHER_LABEL);
                rsx!(
                    div { style: "display: grid; grid-template-columns: 180px 1fr 140px; gap: 8px; align-items: center; margin: 3px 0;",
                        span { style: "overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", title: "{row.label}", "{row.label}" }
                        div { style: "background: #f0f0f0; border-radius: 3px;",
                            div { style: "{fill}" }
                        }
                        span { style: "text-align: right; font-variant-numeric: tabular-nums;", "{row.value_text}" }
                    }
                )
            })}
        }
    }
}

#[component]
pub fn PivotView(title: String, table: PivotTable) -> Element {
    let header_style = table_header_cell_style();
    let label_style = table_cell_style(false);
    let number_style = table_cell_style(true);

    rsx! {
        div { style: "margin-bottom: 16px;",
            h3 { style: "margin: 8px 0;", "{title}" }
            if table.row_keys.is_empty() {
                p { style: "color: #888;", "No data for the current filters" }
            } else {
                div { style: table_container_style(),
                    table { style: "border-collapse: collapse; width: 100%;",
                        thead {
                            tr {
                                th { style: header_style, "" }
                                {table.col_keys.iter().map(|col| rsx!(th { style: header_style, "{col}" }))}
                            }
                        }
                        tbody {
                            {table.row_keys.iter().zip(table.values.iter()).map(|(row_key, cells)| rsx!(
                                tr {
                                    td { style: label_style, "{row_key}" }
                                    {cells.iter().map(|value| {
                                        let text = format_number_with_commas(*value, 2);
                                        rsx!(td { style: number_style, "{text}" })
                                    })}
                                }
                            ))}
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn CheckList(
    title: String,
    options: Vec<String>,
    selection: Option<BTreeSet<String>>,
    on_change: EventHandler<Option<BTreeSet<String>>>,
) -> Element {
    rsx! {
        div { style: "margin-bottom: 12px;",
            div { style: "display: flex; justify-content: space-between; align-items: center; font-weight: 600;",
                span { "{title}" }
                span { style: "display: inline-flex; gap: 4px;",
                    button {
                        style: "font-size: 11px; padding: 1px 6px;",
                        onclick: move |_| on_change.call(None),
                        "All"
                    }
                    button {
                        style: "font-size: 11px; padding: 1px 6px;",
                        onclick: move |_| on_change.call(Some(BTreeSet::new())),
                        "None"
                    }
                }
            }
            div { style: "max-height: 200px; overflow-y: auto; margin-top: 4px;",
                {options.iter().map(|option| {
                    let checked = is_selected(&selection, option);
                    let value = option.clone();
                    let options = options.clone();
                    let selection = selection.clone();
                    rsx!(
                        label {
                            style: "display: flex; align-items: center; gap: 6px; padding: 2px 0; cursor: pointer;",
                            input {
                                r#type: "checkbox",
                                checked: checked,
                                onclick: move |_| {
                                    on_change.call(toggle_selection(&selection, &options, &value, !checked));
                                }
                            }
                            span { "{option}" }
                        }
                    )
                })}
            }
        }
    }
}

#[component]
pub fn DetailsTable(columns: Vec<String>, rows: Vec<Vec<String>>, total: usize) -> Element {
    let header_style = table_header_cell_style();
    let cell_style = table_cell_style(false);
    let shown = rows.len();

    rsx! {
        div { style: "margin-bottom: 16px;",
            p { style: "color: #666;", "Showing {shown} of {total} rows" }
            div { style: table_container_style(),
                table { style: "border-collapse: collapse; width: 100%;",
                    thead {
                        tr {
                            {columns.iter().map(|header| rsx!(th { style: header_style, "{header}" }))}
                        }
                    }
                    tbody {
                        {rows.iter().map(|row| rsx!(
                            tr {
                                {row.iter().map(|value| rsx!(td { style: cell_style, "{value}" }))}
                            }
                        ))}
                    }
                }
            }
        }
    }
}
