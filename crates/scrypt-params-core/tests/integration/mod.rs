mod pick_params;
mod salt_source;
