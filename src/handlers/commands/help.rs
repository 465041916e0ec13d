//! Help command handler

/// Command reference printed by `help`
pub fn help_text() -> &'static str {
    "MediTrip navigator commands\n\n\
     Navigation:\n\
     \x20 load <url|path>        synchronize with a location\n\
     \x20 pop <path>             simulate a browser back/forward landing on <path>\n\
     \x20 back | forward         native history navigation\n\
     \x20 up                     go to the parent page\n\
     \x20 home | marketplace | doctors | packages\n\
     \x20 hospital <slug> | doctor <slug> | package <slug>\n\
     \x20 tour | facilities | insights\n\
     \x20 facility <name> | article <title> | research <title>\n\
     \x20 specialization <name> | treatment <name>\n\n\
     Sessions and filters:\n\
     \x20 search <query> [origin=..] [lat=.. lng=..]\n\
     \x20 filter key=value ...   (query, origin, list, or any marketplace field)\n\
     \x20 clear                  reset filters\n\
     \x20 new | sessions | select <id>\n\
     \x20 say <text> | reply <text>\n\
     \x20 initial                consume the staged search query\n\
     \x20 chat                   toggle the chat panel\n\
     \x20 backup | restore <file>\n\n\
     Other:\n\
     \x20 state | help | quit"
}
