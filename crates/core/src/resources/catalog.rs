// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarations of the built-in resource kinds

use serde_json::json;

use crate::model::command::{executable, monitorable, read_only, resource, survey};
use crate::model::{
    ArgSpec, Behavior, CommandSpec, DefinitionError, Field, FieldOptions, FieldType, OptionSpec,
    Relation, ResourceBuilder, ResourceDefinition,
};

use super::node::EdgeKind;
use super::notification::{CONFIG_FIELDS, NOTIFICATION_TYPES};

pub(super) fn definitions() -> Result<Vec<ResourceDefinition>, DefinitionError> {
    [
        organization(),
        user(),
        team(),
        credential_type(),
        credential(),
        inventory(),
        host(),
        group(),
        inventory_source(),
        label(),
        instance_group(),
        project(),
        project_update(),
        job_template(),
        job(),
        workflow(),
        workflow_job(),
        unified_job(),
        node(),
        notification_template(),
        setting(),
    ]
    .into_iter()
    .map(ResourceBuilder::build)
    .collect()
}

fn description() -> Field {
    Field::new("description").optional().hidden()
}

fn verbosity() -> Field {
    Field::new("verbosity")
        .typed(FieldType::MappedChoice(vec![
            (0, "default".into()),
            (1, "verbose".into()),
            (2, "more_verbose".into()),
            (3, "debug".into()),
            (4, "connection_debug".into()),
        ]))
        .optional()
        .hidden()
}

fn variables(name: &str) -> Field {
    Field::new(name)
        .typed(FieldType::Variables)
        .optional()
        .hidden()
}

fn flag(name: &str) -> Field {
    Field::new(name).typed(FieldType::Boolean).optional().hidden()
}

fn organization() -> ResourceBuilder {
    ResourceBuilder::new("organization")
        .endpoint("/organizations/")
        .help("Manage organizations.")
        .inherit(resource())
        .field(Field::new("name").unique())
        .field(description())
        .relation(Relation::new("users", "user").suffix(""))
        .relation(Relation::new("admins", "user").suffix("admin"))
        .relation(Relation::new("instance_groups", "instance_group").suffix("ig"))
}

fn user() -> ResourceBuilder {
    ResourceBuilder::new("user")
        .endpoint("/users/")
        .help("Manage users.")
        .identity(&["username"])
        .inherit(resource())
        .field(Field::new("username").unique())
        .field(Field::new("password").optional().hidden().no_lookup())
        .field(Field::new("email").unique())
        .field(Field::new("first_name").optional())
        .field(Field::new("last_name").optional())
        .field(Field::new("is_superuser").typed(FieldType::Boolean).optional())
        .field(Field::new("is_system_auditor").typed(FieldType::Boolean).optional())
}

fn team() -> ResourceBuilder {
    ResourceBuilder::new("team")
        .endpoint("/teams/")
        .help("Manage teams.")
        .identity(&["organization", "name"])
        .inherit(resource())
        .depends_on("organization")
        .field(Field::new("name").unique())
        .field(Field::new("organization").related("organization"))
        .field(description())
        .relation(Relation::new("users", "user").suffix(""))
}

fn credential_type() -> ResourceBuilder {
    ResourceBuilder::new("credential_type")
        .endpoint("/credential_types/")
        .help("Manage credential types.")
        .identity(&["kind", "name"])
        .inherit(resource())
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("kind").choice(&["ssh", "vault", "net", "scm", "cloud", "insights"]))
        .field(variables("inputs"))
        .field(variables("injectors"))
}

fn credential() -> ResourceBuilder {
    ResourceBuilder::new("credential")
        .endpoint("/credentials/")
        .help("Manage credentials.")
        .identity(&["organization", "user", "team", "name"])
        .inherit(resource())
        .depends_on("organization")
        .depends_on("credential_type")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("user").related("user").optional().hidden().no_lookup())
        .field(Field::new("team").related("team").optional().hidden().no_lookup())
        .field(Field::new("organization").related("organization").optional().hidden())
        .field(Field::new("credential_type").related("credential_type"))
        .field(variables("inputs"))
}

fn inventory() -> ResourceBuilder {
    ResourceBuilder::new("inventory")
        .endpoint("/inventories/")
        .help("Manage inventories.")
        .identity(&["organization", "name"])
        .inherit(resource())
        .depends_on("organization")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("organization").related("organization"))
        .field(variables("variables"))
        .field(Field::new("kind").choice(&["", "smart"]).optional().hidden())
        .field(Field::new("host_filter").optional().hidden())
        .relation(Relation::new("instance_groups", "instance_group").suffix("ig"))
}

fn host() -> ResourceBuilder {
    ResourceBuilder::new("host")
        .endpoint("/hosts/")
        .help("Manage hosts belonging to an inventory.")
        .identity(&["inventory", "name"])
        .inherit(resource())
        .depends_on("inventory")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("inventory").related("inventory"))
        .field(Field::new("enabled").typed(FieldType::Boolean).optional())
        .field(variables("variables"))
        .relation(Relation::new("groups", "group").suffix(""))
}

fn group() -> ResourceBuilder {
    ResourceBuilder::new("group")
        .endpoint("/groups/")
        .help("Manage groups belonging to an inventory.")
        .identity(&["inventory", "name"])
        .inherit(resource())
        .depends_on("inventory")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("inventory").related("inventory"))
        .field(variables("variables"))
        .relation(Relation::new("hosts", "host"))
}

fn inventory_source() -> ResourceBuilder {
    ResourceBuilder::new("inventory_source")
        .endpoint("/inventory_sources/")
        .unified_job_type("/inventory_updates/")
        .help("Manage inventory sources.")
        .identity(&["inventory", "name"])
        .inherit(resource())
        .inherit(monitorable())
        .depends_on("inventory")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("inventory").related("inventory"))
        .field(Field::new("source").choice(&[
            "file", "scm", "ec2", "vmware", "gce", "azure_rm", "openstack", "satellite6",
            "cloudforms", "custom",
        ]))
        .field(Field::new("credential").related("credential").optional().hidden())
        .field(variables("source_vars"))
        .field(Field::new("source_project").related("project").optional().hidden())
        .field(Field::new("source_path").optional().hidden())
        .field(flag("overwrite"))
        .field(flag("overwrite_vars"))
        .field(flag("update_on_launch"))
}

fn label() -> ResourceBuilder {
    ResourceBuilder::new("label")
        .endpoint("/labels/")
        .help("Manage labels.")
        .inherit(resource())
        .depends_on("organization")
        .field(Field::new("name").unique())
        .field(Field::new("organization").related("organization").hidden())
}

fn instance_group() -> ResourceBuilder {
    ResourceBuilder::new("instance_group")
        .endpoint("/instance_groups/")
        .help("Check instance groups.")
        .inherit(read_only())
        .field(Field::new("name").optional())
        .field(Field::new("capacity").typed(FieldType::Integer).optional())
        .field(Field::new("consumed_capacity").typed(FieldType::Integer).optional())
}

fn job_options(command: CommandSpec) -> CommandSpec {
    command
        .option(OptionSpec::flag("monitor", "Stream the job's output until it finishes"))
        .option(OptionSpec::flag("wait", "Wait for the job to finish"))
        .option(OptionSpec::value("timeout", "Give up monitoring after this many seconds"))
}

fn project() -> ResourceBuilder {
    ResourceBuilder::new("project")
        .endpoint("/projects/")
        .unified_job_type("/project_updates/")
        .help("Manage projects.")
        .behavior(Behavior::Project)
        .inherit(resource())
        .inherit(monitorable())
        .depends_on("organization")
        .depends_on("credential")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("organization").related("organization").optional().hidden())
        .field(
            Field::new("scm_type")
                .typed(FieldType::MappedChoice(vec![
                    (0, "manual".into()),
                    (1, "git".into()),
                    (2, "hg".into()),
                    (3, "svn".into()),
                    (4, "insights".into()),
                ]))
                .optional(),
        )
        .field(Field::new("scm_url").optional())
        .field(Field::new("local_path").optional().hidden())
        .field(Field::new("scm_branch").optional().hidden())
        .field(Field::new("scm_credential").related("credential").optional().hidden())
        .field(flag("scm_clean"))
        .field(flag("scm_delete_on_update"))
        .field(flag("scm_update_on_launch"))
        .field(Field::new("scm_update_cache_timeout").typed(FieldType::Integer).optional().hidden())
        .field(
            Field::new("job_timeout")
                .typed(FieldType::Integer)
                .optional()
                .hidden()
                .help("Seconds before an update is canceled"),
        )
        .command(job_options(CommandSpec::new("create", "")))
        .command(job_options(
            CommandSpec::new("update", "Update the project from its source control.")
                .pk()
                .fields(FieldOptions::Unique),
        ))
        .command(
            CommandSpec::new("status", "Print the status of the most recent update.")
                .pk()
                .option(OptionSpec::flag("detail", "Print the full update record"))
                .fields(FieldOptions::Unique),
        )
}

fn project_update() -> ResourceBuilder {
    ResourceBuilder::new("project_update")
        .endpoint("/project_updates/")
        .help("Inspect project updates.")
        .identity(&["id"])
        .inherit(executable())
        .disable("create")
        .disable("modify")
        .disable("copy")
        .field(Field::new("project").related("project"))
        .field(Field::new("name").optional().read_only())
        .field(Field::new("status").optional().read_only())
        .field(Field::new("created").optional().read_only())
        .field(Field::new("elapsed").optional().read_only())
}

fn notification_link(kind: &str, verb: &str) -> CommandSpec {
    let preposition = if verb == "associate" { "with" } else { "from" };
    CommandSpec::new(
        &format!("{}_notification_template", verb),
        &format!(
            "{} a notification template {} this {}.",
            capitalize(verb),
            preposition,
            kind
        ),
    )
    .option(OptionSpec::value(kind, &format!("The {}", kind)).required())
    .option(OptionSpec::value("notification_template", "The notification template").required())
    .option(
        OptionSpec::value("status", "Job result that triggers the notification: any, error or success")
            .default_value("any"),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn job_template() -> ResourceBuilder {
    ResourceBuilder::new("job_template")
        .endpoint("/job_templates/")
        .help("Manage job templates.")
        .behavior(Behavior::JobTemplate)
        .inherit(survey())
        .depends_on("inventory")
        .depends_on("credential")
        .depends_on("project")
        .field(Field::new("name").unique())
        .field(description())
        .field(
            Field::new("job_type")
                .choice(&["run", "check"])
                .optional()
                .hidden()
                .help("Defaults to run on creation"),
        )
        .field(Field::new("inventory").related("inventory").optional())
        .field(Field::new("project").related("project"))
        .field(Field::new("playbook"))
        .field(Field::new("credential").related("credential").optional().hidden())
        .field(Field::new("vault_credential").related("credential").optional().hidden())
        .field(Field::new("forks").typed(FieldType::Integer).optional().hidden())
        .field(Field::new("limit").optional().hidden())
        .field(verbosity())
        .field(variables("extra_vars").multiple().short('e'))
        .field(Field::new("job_tags").optional().hidden())
        .field(Field::new("skip_tags").optional().hidden())
        .field(Field::new("timeout").typed(FieldType::Integer).optional().hidden())
        .field(flag("ask_diff_mode_on_launch"))
        .field(flag("ask_variables_on_launch"))
        .field(flag("ask_limit_on_launch"))
        .field(flag("ask_tags_on_launch"))
        .field(flag("ask_skip_tags_on_launch"))
        .field(flag("ask_job_type_on_launch"))
        .field(flag("ask_verbosity_on_launch"))
        .field(flag("ask_inventory_on_launch"))
        .field(flag("ask_credential_on_launch"))
        .field(flag("survey_enabled"))
        .field(variables("survey_spec").no_lookup())
        .field(flag("become_enabled"))
        .relation(Relation::new("labels", "label"))
        .relation(Relation::new("instance_groups", "instance_group").suffix("ig"))
        .relation(Relation::new("extra_credentials", "credential").suffix("credential"))
        .command(notification_link("job_template", "associate"))
        .command(notification_link("job_template", "disassociate"))
}

fn job() -> ResourceBuilder {
    ResourceBuilder::new("job")
        .endpoint("/jobs/")
        .help("Launch or monitor jobs.")
        .identity(&["id"])
        .behavior(Behavior::Job)
        .inherit(executable())
        .disable("create")
        .disable("modify")
        .disable("copy")
        .field(Field::new("job_template").related("job_template").optional().short('J'))
        .field(Field::new("job_explanation").optional().hidden().read_only())
        .field(Field::new("created").optional().read_only())
        .field(Field::new("status").optional().read_only())
        .field(Field::new("elapsed").optional().read_only())
        .command(
            job_options(CommandSpec::new("launch", "Launch a job from a job template."))
                .option(OptionSpec::value("job_template", "The job template to launch").short('J').required())
                .option(OptionSpec::flag("no_input", "Never ask for values at launch"))
                .option(OptionSpec::multiple("extra_vars", "Extra variables; JSON, YAML, key=value or @file").short('e'))
                .option(OptionSpec::value("diff_mode", "Run in diff mode"))
                .option(OptionSpec::value("limit", "Limit the hosts the job runs on"))
                .option(OptionSpec::value("tags", "Only run tasks with these tags"))
                .option(OptionSpec::value("skip_tags", "Skip tasks with these tags"))
                .option(OptionSpec::value("job_type", "run or check"))
                .option(OptionSpec::value("verbosity", "Playbook verbosity, 0 to 4"))
                .option(OptionSpec::value("inventory", "Inventory to run against"))
                .option(OptionSpec::value("credential", "Machine credential to use")),
        )
}

fn workflow() -> ResourceBuilder {
    ResourceBuilder::new("workflow")
        .endpoint("/workflow_job_templates/")
        .unified_job_type("/workflow_jobs/")
        .help("Manage workflow job templates.")
        .behavior(Behavior::Survey)
        .inherit(survey())
        .depends_on("organization")
        .field(Field::new("name").unique())
        .field(description())
        .field(variables("extra_vars").multiple().short('e'))
        .field(Field::new("organization").related("organization").optional().hidden())
        .field(flag("survey_enabled"))
        .field(flag("allow_simultaneous"))
        .field(variables("survey_spec").no_lookup())
        .relation(Relation::new("labels", "label"))
        .command(notification_link("workflow", "associate"))
        .command(notification_link("workflow", "disassociate"))
}

fn workflow_job() -> ResourceBuilder {
    ResourceBuilder::new("workflow_job")
        .endpoint("/workflow_jobs/")
        .help("Launch or monitor workflow jobs.")
        .identity(&["id"])
        .behavior(Behavior::WorkflowJob)
        .inherit(executable())
        .disable("create")
        .disable("modify")
        .disable("copy")
        .disable("stdout")
        .field(Field::new("workflow_job_template").related("workflow").optional())
        .field(variables("extra_vars").multiple())
        .field(Field::new("created").optional().read_only())
        .field(Field::new("status").optional().read_only())
        .command(
            CommandSpec::new("summary", "Print a table of the finished jobs in a workflow job.")
                .pk()
                .option(OptionSpec::value("start_line", "First line to print"))
                .option(OptionSpec::value("end_line", "Line to stop before")),
        )
        .command(
            job_options(CommandSpec::new("launch", "Launch a workflow job."))
                .option(OptionSpec::value("workflow_job_template", "The workflow to launch").short('W').required())
                .option(OptionSpec::multiple("extra_vars", "Extra variables; JSON, YAML, key=value or @file").short('e')),
        )
}

fn unified_job() -> ResourceBuilder {
    ResourceBuilder::new("unified_job")
        .endpoint("/unified_jobs/")
        .help("List jobs of every type.")
        .identity(&["id"])
        .inherit(read_only())
        .field(Field::new("name").optional())
        .field(Field::new("type").optional())
        .field(Field::new("status").optional())
        .field(Field::new("elapsed").optional().read_only())
}

fn node_edge(kind: EdgeKind, associate: bool) -> CommandSpec {
    let command = if associate {
        kind.associate_command()
    } else {
        kind.disassociate_command()
    };
    let help = if associate {
        format!("Run the child node after the parent on {}.", kind.as_str())
    } else {
        format!("Stop running the child node after the parent on {}.", kind.as_str())
    };
    let child = if associate {
        ArgSpec::optional("child", "Child node; created from the given fields when omitted")
    } else {
        ArgSpec::required("child", "Child node")
    };
    let spec = CommandSpec::new(&command, &help)
        .arg(ArgSpec::required("parent", "Parent node"))
        .arg(child);
    if associate {
        unified_job_template_options(spec.fields(FieldOptions::All))
    } else {
        spec.fields(FieldOptions::None)
    }
}

fn unified_job_template_options(command: CommandSpec) -> CommandSpec {
    command
        .option(OptionSpec::value("job_template", "Job template the node runs"))
        .option(OptionSpec::value("project", "Project the node updates"))
        .option(OptionSpec::value("inventory_source", "Inventory source the node updates"))
}

fn node() -> ResourceBuilder {
    let mut builder = ResourceBuilder::new("node")
        .endpoint("/workflow_job_template_nodes/")
        .help("Manage nodes inside of a workflow job template.")
        .identity(&["id"])
        .behavior(Behavior::WorkflowNode)
        .inherit(resource())
        .depends_on("workflow")
        .field(Field::new("workflow_job_template").related("workflow").short('W'))
        .field(Field::new("unified_job_template").typed(FieldType::Integer).optional())
        .field(variables("extra_data"))
        .field(Field::new("inventory").related("inventory").optional().hidden())
        .field(Field::new("credential").related("credential").optional().hidden())
        .field(Field::new("job_type").optional().hidden())
        .field(Field::new("job_tags").optional().hidden())
        .field(Field::new("skip_tags").optional().hidden())
        .field(Field::new("limit").optional().hidden())
        .field(flag("diff_mode"))
        .field(verbosity())
        .relation(Relation::new("credentials", "credential"))
        .command(unified_job_template_options(CommandSpec::new("create", "")))
        .command(unified_job_template_options(CommandSpec::new("modify", "")))
        .command(unified_job_template_options(CommandSpec::new("list", "")));
    for kind in EdgeKind::ALL {
        builder = builder
            .command(node_edge(kind, true))
            .command(node_edge(kind, false));
    }
    builder
}

fn notification_template() -> ResourceBuilder {
    let mut builder = ResourceBuilder::new("notification_template")
        .endpoint("/notification_templates/")
        .help("Manage notification templates.")
        .behavior(Behavior::NotificationTemplate)
        .inherit(resource())
        .depends_on("organization")
        .field(Field::new("name").unique())
        .field(description())
        .field(Field::new("organization").related("organization").optional().hidden())
        .field(Field::new("notification_type").choice(NOTIFICATION_TYPES))
        .command(
            CommandSpec::new("create", "")
                .option(OptionSpec::value("job_template", "Job template to attach the notification to"))
                .option(OptionSpec::value("status", "Job result that triggers it: any, error or success")),
        );
    for spec in CONFIG_FIELDS {
        let mut field = Field::new(spec.name)
            .typed(spec.kind.field_type())
            .optional()
            .hidden()
            .no_lookup()
            .help(spec.help);
        if spec.multiple {
            field = field.multiple();
        }
        if let Some(default) = spec.default {
            field = field.default_value(json!(default));
        }
        builder = builder.field(field);
    }
    builder
}

fn setting() -> ResourceBuilder {
    ResourceBuilder::new("setting")
        .endpoint("/settings/all/")
        .help("Manage server settings.")
        .identity(&["id"])
        .behavior(Behavior::Setting)
        .inherit(resource())
        .disable("create")
        .disable("delete")
        .disable("copy")
        .field(Field::new("value").typed(FieldType::Variables))
        .command(
            CommandSpec::new("list", "")
                .option(OptionSpec::value("category", "Only list settings in this category"))
                .fields(FieldOptions::None),
        )
        .command(
            CommandSpec::new("get", "Return the value of one setting.")
                .arg(ArgSpec::required("id", "Setting name"))
                .fields(FieldOptions::None),
        )
        .command(
            CommandSpec::new("modify", "Change the value of one setting.")
                .arg(ArgSpec::required("id", "Setting name"))
                .arg(ArgSpec::required("value", "New value; @path reads a file"))
                .fields(FieldOptions::None),
        )
}

