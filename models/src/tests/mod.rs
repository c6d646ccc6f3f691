mod remote_menu;
